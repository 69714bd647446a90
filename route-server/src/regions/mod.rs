//! Neighborhood lookup.
//!
//! Neighborhoods are the named polygons users pick as origin and
//! destination. Names are matched ignoring case, surrounding whitespace and
//! Spanish accents, so "quebraditas" finds "Quebraditas" and "san jose"
//! finds "San José".

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::catalog::{Catalog, CatalogError};
use crate::domain::{Polygon, Region};

/// A named neighborhood boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    pub name: String,
    /// District the neighborhood belongs to, if the asset records one.
    pub district_id: Option<String>,
    pub polygon: Polygon,
}

impl Neighborhood {
    /// The neighborhood as a matchable region.
    pub fn region(&self) -> Region {
        Region::Polygon(self.polygon.clone())
    }
}

/// Neighborhood entry as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionEntry {
    pub name: String,
    pub district_id: Option<String>,
}

impl From<&Neighborhood> for RegionEntry {
    fn from(n: &Neighborhood) -> Self {
        Self {
            name: n.name.clone(),
            district_id: n.district_id.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Index {
    /// Catalog order.
    neighborhoods: Vec<Neighborhood>,
    /// Normalized name → position; the first neighborhood with a name wins.
    by_name: HashMap<String, usize>,
}

impl Index {
    fn build(neighborhoods: Vec<Neighborhood>) -> Self {
        let mut by_name = HashMap::with_capacity(neighborhoods.len());
        for (i, n) in neighborhoods.iter().enumerate() {
            by_name.entry(normalize(&n.name)).or_insert(i);
        }
        Self {
            neighborhoods,
            by_name,
        }
    }
}

/// Thread-safe neighborhood directory with background refresh support.
#[derive(Clone)]
pub struct RegionDirectory {
    inner: Arc<RwLock<Index>>,
    catalog: Catalog,
}

impl RegionDirectory {
    /// Load the directory from the catalog.
    pub async fn load(catalog: Catalog) -> Result<Self, CatalogError> {
        let neighborhoods = catalog.list_regions().await?;
        Ok(Self::from_neighborhoods(catalog, neighborhoods))
    }

    /// Build a directory from already-loaded neighborhoods.
    pub fn from_neighborhoods(catalog: Catalog, neighborhoods: Vec<Neighborhood>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Index::build(neighborhoods))),
            catalog,
        }
    }

    /// Look a neighborhood up by name.
    pub async fn get(&self, name: &str) -> Option<Neighborhood> {
        let guard = self.inner.read().await;
        let &i = guard.by_name.get(&normalize(name))?;
        guard.neighborhoods.get(i).cloned()
    }

    /// Neighborhoods whose name contains `query`.
    ///
    /// Names starting with the query come first, each group sorted by name.
    /// An empty query lists everything in catalog order.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<RegionEntry> {
        let guard = self.inner.read().await;
        let query = normalize(query);

        if query.is_empty() {
            return guard
                .neighborhoods
                .iter()
                .take(limit)
                .map(RegionEntry::from)
                .collect();
        }

        let mut hits: Vec<(bool, String, &Neighborhood)> = guard
            .neighborhoods
            .iter()
            .filter_map(|n| {
                let key = normalize(&n.name);
                let pos = key.find(&query)?;
                Some((pos != 0, key, n))
            })
            .collect();
        hits.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        hits.into_iter()
            .take(limit)
            .map(|(_, _, n)| RegionEntry::from(n))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.neighborhoods.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.neighborhoods.is_empty()
    }

    /// Reload from the catalog.
    ///
    /// On failure the current directory is kept and the error returned.
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let neighborhoods = self.catalog.list_regions().await?;
        let index = Index::build(neighborhoods);
        let count = index.neighborhoods.len();

        *self.inner.write().await = index;
        Ok(count)
    }
}

/// Lowercase, strip accents and collapse whitespace.
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.chars().flat_map(char::to_lowercase).map(fold_accent).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}
