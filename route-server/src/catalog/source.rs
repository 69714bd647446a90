//! Where catalog assets are read from.

use std::path::PathBuf;

use super::client::HttpCatalog;
use super::error::CatalogError;

/// Backing store for the asset layout.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// A local directory (the same tree is served under `/assets`).
    Directory(PathBuf),
    /// A remote static file host.
    Http(HttpCatalog),
}

impl AssetSource {
    /// Read an asset by its path relative to the layout root.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        match self {
            AssetSource::Directory(root) => {
                let full = root.join(path);
                tokio::fs::read(&full).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        CatalogError::NotFound(path.to_string())
                    } else {
                        CatalogError::Io {
                            path: full.display().to_string(),
                            message: e.to_string(),
                        }
                    }
                })
            }
            AssetSource::Http(client) => client.fetch(path).await,
        }
    }

    /// The local directory, if any.
    pub fn directory(&self) -> Option<&std::path::Path> {
        match self {
            AssetSource::Directory(root) => Some(root),
            AssetSource::Http(_) => None,
        }
    }
}
