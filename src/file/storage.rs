//! Blob storage for DataShare.
//!
//! Uploaded content is written under a single base directory with
//! UUID-based names, sharded by the first 2 characters of the UUID so
//! no single directory grows unbounded. The stored name is what the
//! database keeps as `storage_path`; share tokens never map to it
//! directly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::Result;

/// Physical storage for uploaded blobs.
///
/// Layout:
/// ```text
/// {base_path}/
/// ├── ab/
/// │   └── ab12cd34-5678-90ab-cdef-123456789012.pdf
/// ├── cd/
/// │   └── cd90ab12-3456-7890-abcd-ef1234567890.bin
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for blob storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage rooted at the given path.
    ///
    /// The base directory is created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write content to storage under a fresh UUID-based name.
    ///
    /// The original filename contributes only its extension; nothing
    /// uploader-controlled ends up in the path. Returns the stored name
    /// (`{uuid}.{ext}`) to persist as the record's storage path.
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let uuid = Uuid::new_v4();
        let ext = Self::extract_extension(original_name);
        let stored_name = format!("{uuid}.{ext}");

        let blob_path = self.blob_path(&stored_name);
        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&blob_path, content)?;

        Ok(stored_name)
    }

    /// Remove a blob from storage.
    ///
    /// Returns `true` if the blob was removed, `false` if it was already
    /// gone. A missing blob is not an error; record deletion must not
    /// depend on the blob still being present.
    pub fn remove(&self, stored_name: &str) -> Result<bool> {
        let blob_path = self.blob_path(stored_name);

        match fs::remove_file(&blob_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a blob exists in storage.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.blob_path(stored_name).exists()
    }

    /// Get the full on-disk path for a stored name.
    ///
    /// The path is `{base_path}/{shard}/{stored_name}` where shard is
    /// the first 2 characters of the stored name.
    pub fn blob_path(&self, stored_name: &str) -> PathBuf {
        let shard = Self::shard(stored_name);
        self.base_path.join(shard).join(stored_name)
    }

    /// Get the shard directory name for a stored name.
    fn shard(stored_name: &str) -> &str {
        if stored_name.len() >= 2 {
            &stored_name[..2]
        } else {
            stored_name
        }
    }

    /// Extract the file extension from a filename, defaulting to "bin".
    fn extract_extension(filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("bin")
    }
}
