//! Byte sources for image references.

use crate::error::ImageError;
use std::future::Future;
use std::path::Path;

/// Reads raw bytes for file and remote references.
///
/// Implementations are shared across concurrent resolutions of one report.
pub trait ImageSource: Send + Sync + 'static {
    /// Read a local file fully.
    fn read_file(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, ImageError>> + Send;

    /// Fetch a remote reference fully.
    fn fetch_remote(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ImageError>> + Send;
}

/// Filesystem-backed source; remote fetches need the `remote` feature.
#[derive(Debug, Clone)]
pub struct FsImageSource {
    max_bytes: usize,
}

impl FsImageSource {
    /// Source refusing anything larger than `max_bytes`.
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl Default for FsImageSource {
    fn default() -> Self {
        Self::new(crate::config::ImageLimits::default().max_source_bytes)
    }
}

impl ImageSource for FsImageSource {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, ImageError> {
        let read_err = |source| ImageError::Read {
            path: path.display().to_string(),
            source,
        };
        let meta = tokio::fs::metadata(path).await.map_err(read_err)?;
        if meta.len() as usize > self.max_bytes {
            return Err(ImageError::TooLarge {
                size: meta.len() as usize,
                limit: self.max_bytes,
            });
        }
        tokio::fs::read(path).await.map_err(read_err)
    }

    #[cfg(feature = "remote")]
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        use std::io::Read;

        let owned = url.to_string();
        let limit = self.max_bytes;
        tokio::task::spawn_blocking(move || {
            let remote_err = |reason: String| ImageError::Remote {
                url: owned.clone(),
                reason,
            };
            let response = ureq::get(&owned)
                .call()
                .map_err(|e| remote_err(e.to_string()))?;
            let mut bytes = Vec::new();
            response
                .into_reader()
                .take(limit as u64 + 1)
                .read_to_end(&mut bytes)
                .map_err(|e| remote_err(e.to_string()))?;
            if bytes.len() > limit {
                return Err(ImageError::TooLarge {
                    size: bytes.len(),
                    limit,
                });
            }
            Ok(bytes)
        })
        .await?
    }

    #[cfg(not(feature = "remote"))]
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        Err(ImageError::RemoteDisabled {
            url: url.to_string(),
        })
    }
}
