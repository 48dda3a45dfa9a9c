//! Asset fetching for image embedding.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::RwLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{AssetFetchError, AssetFetchResult};

/// Boxed future for async fetches.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Bytes of a fetched asset.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    /// MIME type reported by the source, if any.
    pub mime: Option<String>,
}

impl FetchedAsset {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, mime: None }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// MIME type from the source or sniffed from the bytes.
    pub fn mime_type(&self) -> AssetFetchResult<String> {
        if let Some(mime) = &self.mime {
            return Ok(mime.clone());
        }
        if looks_like_svg(&self.bytes) {
            return Ok("image/svg+xml".to_string());
        }
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type().to_string())
            .map_err(|e| AssetFetchError::Unsupported(e.to_string()))
    }

    /// `data:` URI embedding the bytes.
    pub fn to_data_uri(&self) -> AssetFetchResult<String> {
        let mime = self.mime_type()?;
        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&self.bytes)))
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    String::from_utf8_lossy(head).contains("<svg")
}

/// Source of image bytes for export.
///
/// Fetches for different elements are polled concurrently, so
/// implementations should not block for long inside a future.
pub trait AssetFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, AssetFetchResult<FetchedAsset>>;
}

/// Reads assets from a directory on disk.
///
/// Sources are resolved relative to the root; absolute paths and `..`
/// components are refused.
pub struct FsAssetFetcher {
    root: PathBuf,
}

impl FsAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, src: &str) -> AssetFetchResult<PathBuf> {
        let src = src.strip_prefix("file://").unwrap_or(src);
        if src.contains("://") {
            return Err(AssetFetchError::Network(format!("No network access for {}", src)));
        }
        let relative = Path::new(src);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AssetFetchError::NotFound(src.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetFetcher for FsAssetFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, AssetFetchResult<FetchedAsset>> {
        Box::pin(async move {
            let path = self.resolve(src)?;
            if !path.is_file() {
                return Err(AssetFetchError::NotFound(path.display().to_string()));
            }
            Ok(FetchedAsset::new(fs::read(&path)?))
        })
    }
}

/// In-memory assets keyed by source.
#[derive(Default)]
pub struct MemoryAssetFetcher {
    assets: RwLock<HashMap<String, FetchedAsset>>,
}

impl MemoryAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, src: impl Into<String>, asset: FetchedAsset) {
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(src.into(), asset);
        }
    }
}

impl AssetFetcher for MemoryAssetFetcher {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, AssetFetchResult<FetchedAsset>> {
        Box::pin(async move {
            let assets = self
                .assets
                .read()
                .map_err(|e| AssetFetchError::Network(format!("Lock error: {}", e)))?;
            assets
                .get(src)
                .cloned()
                .ok_or_else(|| AssetFetchError::NotFound(src.to_string()))
        })
    }
}
