//! Blob storage for plan PDFs.
//!
//! Plan PDFs are addressed by a path relative to the storage root:
//! `plans/{company_id}/{plan_id}.pdf`. The record stores the path and a BLAKE3
//! content hash; the bytes live in a [`StorageBackend`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use madori_db::file_storage::{plan_storage_path, FilesystemBackend, StorageBackend};
//!
//! let backend = FilesystemBackend::new("/var/lib/madori/files");
//! backend.validate().await?;
//!
//! let path = plan_storage_path(&company_id, &plan_id);
//! backend.write(&path, &pdf_bytes).await?;
//! ```

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use madori_core::{Error, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Storage backend trait for different storage implementations.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data to the specified path, replacing any existing blob.
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read data from the specified path.
    ///
    /// A missing blob is `Error::NotFound`.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete data at the specified path. Deleting a missing blob is a no-op.
    async fn delete(&self, path: &str) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Filesystem storage backend rooted at a base directory.
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a storage path under the base directory.
    ///
    /// Only plain relative components are accepted.
    fn full_path(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(Error::Storage(format!("Invalid storage path: {}", path)));
        }
        Ok(self.base_path.join(relative))
    }

    /// Validate that the backend can write, read, and delete files.
    ///
    /// Run once at startup so permission or mount problems fail fast.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join("plans/.health-check");
        let test_file = test_dir.join("test.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await;

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path)?;
        debug!(
            subsystem = "storage",
            storage_path = %path,
            size_bytes = data.len(),
            "file_storage: write"
        );

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "file_storage: create_dir_all failed");
                e
            })?;
        }

        // temp file + rename keeps readers from seeing a partial PDF
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "file_storage: File::create failed");
            e
        })?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "file_storage: rename failed");
            e
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path)?;
        match fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Blob not found: {}", path)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.full_path(path)?;
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.full_path(path)?;
        Ok(fs::try_exists(full_path).await?)
    }
}

/// Compute BLAKE3 hash of data with "blake3:" prefix.
///
/// Returns a string in the format: `blake3:{64-char-hex}`
pub fn compute_content_hash(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    format!("blake3:{}", hash.to_hex())
}

/// Storage path of a plan's PDF: `plans/{company_id}/{plan_id}.pdf`.
pub fn plan_storage_path(company_id: &Uuid, plan_id: &Uuid) -> String {
    format!(
        "plans/{}/{}.pdf",
        company_id.as_hyphenated(),
        plan_id.as_hyphenated()
    )
}
