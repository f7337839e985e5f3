use crate::engine::{Compression, Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::debug;

/// Fluent configuration for a [`Storage`] handle.
#[derive(Debug)]
pub struct StorageBuilder {
    root: Option<PathBuf>,
    compression: Compression,
    create: bool,
}

impl Default for StorageBuilder {
    fn default() -> Self {
        Self { root: None, compression: Compression::None, create: true }
    }
}

impl StorageBuilder {
    #[must_use = "Sets the root directory of the storage"]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    #[must_use = "Sets compression for stored payloads"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use = "Sets whether a missing root directory is created"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }

    /// Opens the storage, creating the root when allowed and purging stale
    /// temporary files from earlier crashes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DirectoryNotFound`] when no root was given or the
    /// root is missing and `create(false)` was set.
    /// Returns [`StorageError::Io`] when the root cannot be created or resolved.
    pub fn connect(self) -> Result<Storage, StorageError> {
        let Some(root) = self.root else {
            return Err(StorageError::DirectoryNotFound {
                message: "no root directory configured".into(),
                context: None,
            });
        };

        if self.create {
            fs::create_dir_all(&root)
                .context(format!("Failed to create storage root {}", root.display()))?;
        } else if !root.is_dir() {
            return Err(StorageError::DirectoryNotFound {
                message: root.display().to_string().into(),
                context: Some("Storage root must exist when creation is disabled".into()),
            });
        }

        let canonical = fs::canonicalize(&root)
            .context(format!("Failed to resolve storage root {}", root.display()))?;
        maintenance::purge_tmp(&canonical);
        debug!(path = %canonical.display(), compression = ?self.compression, "Storage opened");

        Ok(Storage {
            inner: Arc::new(StorageInner {
                root: canonical,
                compression: self.compression,
                tmp_counter: AtomicU64::new(1),
            }),
        })
    }
}
