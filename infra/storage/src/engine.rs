//! The [`Storage`] handle: sandboxed, atomic and optionally compressed file I/O
//! over a single directory.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::{self, TMP_MARKER};
use crate::security;
use std::fs;
use std::io::{ErrorKind, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn encode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decode(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

#[derive(Debug)]
pub struct StorageInner {
    /// Canonical root directory; every resolved path lives below it.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    pub(crate) tmp_counter: AtomicU64,
}

/// A cheaply cloneable handle to a sandboxed directory.
///
/// # Example
///
/// ```rust
/// use rosetta_storage::{Compression, Storage, StorageError};
///
/// fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let storage = Storage::builder()
///         .root(tmp.path().join("cache"))
///         .compression(Compression::Lz4)
///         .connect()?;
///
///     storage.write("catalogue.en.bin", b"compiled")?;
///     assert_eq!(storage.read("catalogue.en.bin")?, b"compiled");
///     assert_eq!(storage.files()?, vec!["catalogue.en.bin".to_owned()]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage is not opened until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::default()
    }

    /// The canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Resolves a relative path inside the sandbox.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path is absolute or escapes the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        security::resolve(&self.root, path)
    }

    /// Reads a file, decompressing it when compression is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileNotFound`] if the file does not exist and
    /// [`StorageError::Decompress`] if the payload is corrupted.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve(path)?;
        let data = fs::read(&resolved).map_err(|err| not_found_or_io(err, &resolved, "Read"))?;
        self.compression.decode(data)
    }

    /// Writes a file atomically: unique temp file, `fsync`, then rename over the target.
    ///
    /// Readers never observe a partially written file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path escapes the
    /// root and [`StorageError::Io`] on any filesystem failure.
    pub fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        let resolved = self.resolve(path)?;
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }

        let temp = self.tmp_path(&resolved);
        let result = Self::write_synced(&temp, &self.compression.encode(data))
            .and_then(|()| {
                fs::rename(&temp, &resolved).context(format!(
                    "Atomic rename failed: {} -> {}",
                    temp.display(),
                    resolved.display()
                ))
            });
        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result?;

        debug!(path = %resolved.display(), bytes = data.len(), "File written atomically");
        Ok(())
    }

    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileNotFound`] if the file does not exist.
    pub fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let resolved = self.resolve(path)?;
        fs::remove_file(&resolved).map_err(|err| not_found_or_io(err, &resolved, "Delete"))?;
        debug!(path = %resolved.display(), "File deleted");
        Ok(())
    }

    /// Whether a regular file exists at `path`.
    ///
    /// # Errors
    ///
    /// Fails only when the path cannot be resolved inside the sandbox.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.is_file())
    }

    /// Last modification time of a file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileNotFound`] if the file does not exist.
    pub fn modified(&self, path: impl AsRef<Path>) -> Result<SystemTime, StorageError> {
        let resolved = self.resolve(path)?;
        fs::metadata(&resolved)
            .and_then(|meta| meta.modified())
            .map_err(|err| not_found_or_io(err, &resolved, "Metadata"))
    }

    /// File names directly under the root, sorted, excluding in-flight temp files.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the root cannot be listed.
    pub fn files(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|err| StorageError::Io {
                source: err.into(),
                context: Some(format!("Failed to list {}", self.root.display()).into()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if !name.contains(TMP_MARKER) => names.push(name.to_owned()),
                Some(_) => {},
                None => warn!(path = %entry.path().display(), "Skipping non UTF-8 file name"),
            }
        }
        Ok(names)
    }

    /// Moves every file of this storage into `target`, one atomic write per
    /// file, removing each source file once it has landed.
    ///
    /// Returns the number of files moved.
    ///
    /// # Errors
    ///
    /// Stops at the first failing file; files already moved stay in `target`.
    pub fn move_into(&self, target: &Self) -> Result<usize, StorageError> {
        let files = self.files()?;
        for name in &files {
            let data = self.read(name)?;
            target.write(name, &data)?;
            self.delete(name)?;
        }
        debug!(
            from = %self.root.display(),
            to = %target.root.display(),
            files = files.len(),
            "Moved storage contents"
        );
        Ok(files.len())
    }

    /// Removes the root directory and everything below it, consuming the handle.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be removed.
    pub fn remove_root(self) -> Result<(), StorageError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to remove {}", self.root.display()).into()),
            }),
        }
    }

    /// Removes stale temp files from interrupted writes. Returns how many were removed.
    pub fn purge_tmp(&self) -> usize {
        maintenance::purge_tmp(&self.root)
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let id = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("entry");
        target.with_file_name(format!("{name}{TMP_MARKER}{}.{id}", std::process::id()))
    }

    fn write_synced(path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
            .context(format!("Temp file creation failed: {}", path.display()))?;
        file.write_all(data).context("Write failed")?;
        file.sync_all().context("Sync failed")
    }
}

fn not_found_or_io(err: std::io::Error, path: &Path, op: &str) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::FileNotFound { message: path.display().to_string().into(), context: None }
    } else {
        StorageError::Io {
            source: err,
            context: Some(format!("{op} failed: {}", path.display()).into()),
        }
    }
}
