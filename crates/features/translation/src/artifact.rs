//! Persistence of compiled catalogues.
//!
//! An artifact is one catalogue with its full fallback chain, encoded with
//! `postcard`. Its file name is a pure function of the locale and the cache
//! vary map, so changing a vary input (such as the fallback chain of the
//! active strategy) moves every locale to a new file without deleting the old
//! ones.

use crate::catalogue::MessageCatalogue;
use crate::error::{TranslationError, TranslationErrorExt};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use moka::sync::Cache;
use rosetta_storage::{Storage, StorageError};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

/// Inputs that change the content of compiled catalogues.
pub type CacheVary = BTreeMap<String, serde_json::Value>;

const FINGERPRINT_LEN: usize = 7;

/// First characters of the url-safe base64 SHA-256 of the serialized vary map.
///
/// # Errors
/// Returns [`TranslationError::Json`] if the vary map cannot be serialized.
pub fn fingerprint(vary: &CacheVary) -> Result<String, TranslationError> {
    let encoded = serde_json::to_vec(vary)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    let digest = URL_SAFE_NO_PAD.encode(hasher.finalize());
    Ok(digest.chars().take(FINGERPRINT_LEN).collect())
}

/// File name of the artifact for `locale` under `vary`.
///
/// # Errors
/// See [`fingerprint`].
pub fn artifact_name(locale: &str, vary: &CacheVary) -> Result<String, TranslationError> {
    Ok(format!("catalogue.{locale}.{}.php", fingerprint(vary)?))
}

/// Backend holding compiled catalogues.
///
/// Paths are names relative to the backend root, as returned by [`Self::path_for`].
pub trait CompiledArtifactStore: Send + Sync + Debug {
    /// # Errors
    /// See [`fingerprint`].
    fn path_for(&self, locale: &str, vary: &CacheVary) -> Result<String, TranslationError> {
        artifact_name(locale, vary)
    }

    /// # Errors
    /// Returns an error when the backend cannot be inspected.
    fn exists(&self, path: &str) -> Result<bool, TranslationError>;

    /// # Errors
    /// Returns an error when the artifact is missing or cannot be decoded.
    fn read(&self, path: &str) -> Result<Arc<MessageCatalogue>, TranslationError>;

    /// # Errors
    /// Returns an error when the artifact cannot be encoded or persisted.
    fn write(&self, path: &str, catalogue: &MessageCatalogue) -> Result<(), TranslationError>;

    /// Removes the artifact; `false` when it was already gone.
    ///
    /// # Errors
    /// Returns an error on any failure other than the artifact missing.
    fn delete(&self, path: &str) -> Result<bool, TranslationError>;

    /// Modification time, `None` when the artifact does not exist.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be inspected.
    fn modified(&self, path: &str) -> Result<Option<SystemTime>, TranslationError>;

    /// Drops the in-process decoded form of the artifact.
    fn invalidate_compiled(&self, path: &str);
}

/// [`CompiledArtifactStore`] on top of [`Storage`].
///
/// Decoded catalogues are kept in memory together with the modification time
/// they were read at; a changed file on disk is decoded again.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    storage: Storage,
    compiled: Cache<String, (SystemTime, Arc<MessageCatalogue>)>,
}

impl FsArtifactStore {
    const COMPILED_CAPACITY: u64 = 1_024;

    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let compiled = Cache::builder()
            .name("compiled-catalogues")
            .max_capacity(Self::COMPILED_CAPACITY)
            .build();
        Self { storage, compiled }
    }

    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl CompiledArtifactStore for FsArtifactStore {
    fn exists(&self, path: &str) -> Result<bool, TranslationError> {
        Ok(self.storage.exists(path)?)
    }

    fn read(&self, path: &str) -> Result<Arc<MessageCatalogue>, TranslationError> {
        let modified = self.storage.modified(path)?;
        if let Some((at, catalogue)) = self.compiled.get(path)
            && at == modified
        {
            trace!(path, "Compiled catalogue served from memory");
            return Ok(catalogue);
        }

        let bytes = self.storage.read(path)?;
        let catalogue: Arc<MessageCatalogue> = Arc::new(
            postcard::from_bytes(&bytes).context(format!("Failed to decode artifact {path}"))?,
        );
        self.compiled.insert(path.to_owned(), (modified, Arc::clone(&catalogue)));
        debug!(path, locale = catalogue.locale(), "Compiled catalogue loaded");
        Ok(catalogue)
    }

    fn write(&self, path: &str, catalogue: &MessageCatalogue) -> Result<(), TranslationError> {
        let bytes = postcard::to_stdvec(catalogue)
            .context(format!("Failed to encode artifact {path}"))?;
        self.compiled.invalidate(path);
        self.storage.write(path, &bytes)?;
        debug!(path, locale = catalogue.locale(), bytes = bytes.len(), "Compiled catalogue dumped");
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<bool, TranslationError> {
        self.invalidate_compiled(path);
        match self.storage.delete(path) {
            Ok(()) => Ok(true),
            Err(StorageError::FileNotFound { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn modified(&self, path: &str) -> Result<Option<SystemTime>, TranslationError> {
        match self.storage.modified(path) {
            Ok(at) => Ok(Some(at)),
            Err(StorageError::FileNotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn invalidate_compiled(&self, path: &str) {
        self.compiled.invalidate(path);
    }
}
