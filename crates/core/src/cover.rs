//! Cover image lookup: cached files, negative markers, and provider checks.
//!
//! Nothing here downloads images. Covers are fetched into the cache by some
//! other process; this module only reports what is already materialized.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::catalog::CatalogObject;
use crate::error::Result;

/// Where cover files live and which objects are known to have none.
pub trait CoverCache: Send + Sync {
    /// True when an earlier lookup concluded the object has no cover.
    fn has_negative_marker(&self, object_id: &str) -> bool;

    /// Deterministic storage path of the object's cover file.
    fn image_path(&self, object_id: &str) -> PathBuf;

    /// Public URL of a stored cover file.
    fn public_url(&self, path: &Path) -> String;
}

/// A cover source that can tell whether it has a cover for an object.
pub trait CoverProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Availability check only. Must not download.
    fn check_availability(&self, object: &CatalogObject) -> bool;
}

/// Width and height from the image header, if the file exists and decodes.
pub fn read_dimensions(path: &Path) -> Option<(u32, u32)> {
    if !path.is_file() {
        return None;
    }
    match decode_dimensions(path) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::debug!("Cover {} not decodable: {}", path.display(), e);
            None
        }
    }
}

// Format comes from the file contents; cached covers all carry `.jpg`.
fn decode_dimensions(path: &Path) -> image::ImageResult<(u32, u32)> {
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
}

/// Directory-backed cover cache.
///
/// Layout under `root`:
/// - `{sha256(object id)}.jpg` for cover files
/// - `negative/{sha256(object id)}` for negative markers
#[derive(Debug, Clone)]
pub struct DirCoverCache {
    root: PathBuf,
    public_base: String,
}

impl DirCoverCache {
    pub fn new(root: impl AsRef<Path>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into();
        Self {
            root: root.as_ref().to_path_buf(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Record that the object has no cover.
    pub fn mark_negative(&self, object_id: &str) -> Result<()> {
        let path = self.negative_path(object_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, object_id.as_bytes())?;
        Ok(())
    }

    /// Forget a negative marker. Missing markers are not an error.
    pub fn clear_negative(&self, object_id: &str) -> Result<()> {
        let path = self.negative_path(object_id);
        if path.is_file() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Store cover bytes for an object at its deterministic path.
    pub fn store(&self, object_id: &str, data: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.image_path(object_id);
        std::fs::write(&path, data)?;
        Ok(path)
    }

    fn negative_path(&self, object_id: &str) -> PathBuf {
        self.root.join("negative").join(file_key(object_id))
    }
}

impl CoverCache for DirCoverCache {
    fn has_negative_marker(&self, object_id: &str) -> bool {
        self.negative_path(object_id).is_file()
    }

    fn image_path(&self, object_id: &str) -> PathBuf {
        self.root.join(format!("{}.jpg", file_key(object_id)))
    }

    fn public_url(&self, path: &Path) -> String {
        let name = path
            .strip_prefix(&self.root)
            .ok()
            .and_then(|p| p.to_str())
            .or_else(|| path.file_name().and_then(|n| n.to_str()))
            .unwrap_or("");
        format!("{}/{}", self.public_base, name.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}

/// Object ids contain characters that are unsafe in file names; hash them.
fn file_key(object_id: &str) -> String {
    let digest = Sha256::digest(object_id.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
