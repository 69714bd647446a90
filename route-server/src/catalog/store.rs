//! Typed access to the catalog asset layout.

use std::path::PathBuf;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{LineEntry, LineId, TransitLine};
use crate::matcher::LineCatalog;
use crate::regions::Neighborhood;
use crate::stops::Stop;

use super::client::HttpCatalog;
use super::convert::{line_from_collection, neighborhoods_from_collection, stops_from_collection};
use super::error::CatalogError;
use super::geojson::FeatureCollection;
use super::source::AssetSource;

/// Catalog listing of every line.
pub const LINE_INDEX_PATH: &str = "routes/index.json";

/// Neighborhood boundaries.
pub const NEIGHBORHOODS_PATH: &str = "neighborhoods.geojson";

/// Stops served by the lines (optional).
pub const STOPS_PATH: &str = "routes/stops.geojson";

/// Path of one line's geometry.
pub fn line_path(id: &LineId) -> String {
    format!("routes/{id}.geojson")
}

#[derive(Debug, Deserialize)]
struct LineIndex {
    lines: Vec<LineEntry>,
}

/// Read-only catalog of lines, neighborhoods and stops.
#[derive(Debug, Clone)]
pub struct Catalog {
    source: AssetSource,
}

impl Catalog {
    pub fn new(source: AssetSource) -> Self {
        Self { source }
    }

    /// Catalog backed by a local directory.
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::new(AssetSource::Directory(root.into()))
    }

    /// Catalog backed by a remote host.
    pub fn http(client: HttpCatalog) -> Self {
        Self::new(AssetSource::Http(client))
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let bytes = self.source.fetch(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::Json {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch_collection(&self, path: &str) -> Result<FeatureCollection, CatalogError> {
        let collection: FeatureCollection = self.fetch_json(path).await?;
        if !collection.is_feature_collection() {
            return Err(CatalogError::Json {
                path: path.to_string(),
                message: format!("expected a FeatureCollection, got {}", collection.kind),
            });
        }
        Ok(collection)
    }

    /// List every line in catalog order.
    pub async fn list_lines(&self) -> Result<Vec<LineEntry>, CatalogError> {
        let index: LineIndex = self.fetch_json(LINE_INDEX_PATH).await?;
        Ok(index.lines)
    }

    /// Fetch and validate one line.
    ///
    /// A payload that is not a feature collection fails with
    /// [`CatalogError::InvalidPayload`], one without a usable polyline with
    /// [`CatalogError::InvalidGeometry`]. Both concern this line only.
    pub async fn load_line(&self, entry: &LineEntry) -> Result<TransitLine, CatalogError> {
        let collection = self
            .fetch_collection(&line_path(&entry.id))
            .await
            .map_err(|e| match e {
                CatalogError::Json { message, .. } => CatalogError::InvalidPayload {
                    id: entry.id.clone(),
                    message,
                },
                other => other,
            })?;
        line_from_collection(entry, &collection).map_err(|source| {
            CatalogError::InvalidGeometry {
                id: entry.id.clone(),
                source,
            }
        })
    }

    /// Look a line up by id and load it.
    pub async fn find_line(&self, id: &LineId) -> Result<TransitLine, CatalogError> {
        let entries = self.list_lines().await?;
        let entry = entries
            .iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("line {id}")))?;
        self.load_line(entry).await
    }

    /// Fetch every neighborhood with a valid boundary.
    pub async fn list_regions(&self) -> Result<Vec<Neighborhood>, CatalogError> {
        let collection = self.fetch_collection(NEIGHBORHOODS_PATH).await?;
        Ok(neighborhoods_from_collection(&collection))
    }

    /// Fetch every stop. A catalog without a stops file has no stops.
    pub async fn list_stops(&self) -> Result<Vec<Stop>, CatalogError> {
        match self.fetch_collection(STOPS_PATH).await {
            Ok(collection) => Ok(stops_from_collection(&collection)),
            Err(CatalogError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

impl LineCatalog for Catalog {
    async fn list_lines(&self) -> Result<Vec<LineEntry>, CatalogError> {
        Catalog::list_lines(self).await
    }

    async fn load_line(&self, entry: &LineEntry) -> Result<TransitLine, CatalogError> {
        Catalog::load_line(self, entry).await
    }
}
