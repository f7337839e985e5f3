use crate::error::TranslationError;
use rosetta_domain::config::{CompressionKind, TranslatorConfig};
use rosetta_storage::Compression;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Construction options of a [`crate::Translator`].
#[derive(Debug, Clone, Default)]
pub struct TranslatorOptions {
    /// Directory of compiled catalogues; no artifacts are written without it.
    pub cache_dir: Option<PathBuf>,
    /// Recompile an artifact when one of its source files is newer.
    pub debug: bool,
    /// Locale to `<domain>.<locale>.<format>` files registered on first load.
    pub resource_files: BTreeMap<String, Vec<PathBuf>>,
    pub cache_vary: BTreeMap<String, String>,
    pub compression: CompressionKind,
    /// `0` disables the resource cache.
    pub resource_cache_capacity: u64,
}

impl TranslatorOptions {
    /// Options from configuration, with resource directories scanned for files.
    ///
    /// # Errors
    /// Returns [`TranslationError::Io`] when a resource directory cannot be read.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TranslationError> {
        let mut resource_files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for dir in &config.resource_dirs {
            for (locale, path) in scan_resource_dir(dir)? {
                resource_files.entry(locale).or_default().push(path);
            }
        }
        Ok(Self {
            cache_dir: config.cache_dir.clone(),
            debug: config.debug,
            resource_files,
            cache_vary: config.cache_vary.clone(),
            compression: config.compression,
            resource_cache_capacity: config.resource_cache_capacity,
        })
    }

    #[must_use]
    pub const fn storage_compression(&self) -> Compression {
        match self.compression {
            CompressionKind::None => Compression::None,
            CompressionKind::Lz4 => Compression::Lz4,
        }
    }
}

/// Parts of a resource file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFileName {
    pub domain: String,
    pub locale: String,
    pub format: String,
}

impl ResourceFileName {
    /// Parses `<domain>.<locale>.<format>`; the domain may contain dots.
    #[must_use]
    pub fn parse(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let (rest, format) = name.rsplit_once('.')?;
        let (domain, locale) = rest.rsplit_once('.')?;
        if domain.is_empty() || locale.is_empty() || format.is_empty() {
            return None;
        }
        Some(Self { domain: domain.to_owned(), locale: locale.to_owned(), format: format.to_owned() })
    }
}

/// Every translation file below `dir`, sorted by path, paired with its locale.
///
/// # Errors
/// Returns [`TranslationError::Io`] when the directory cannot be walked.
pub fn scan_resource_dir(dir: &Path) -> Result<Vec<(String, PathBuf)>, TranslationError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| TranslationError::Io {
            source: err.into(),
            context: Some(format!("Failed to scan {}", dir.display()).into()),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        match ResourceFileName::parse(entry.path()) {
            Some(parsed) => found.push((parsed.locale, entry.into_path())),
            None => warn!(path = %entry.path().display(), "Ignoring file outside the <domain>.<locale>.<format> layout"),
        }
    }
    debug!(dir = %dir.display(), files = found.len(), "Resource directory scanned");
    Ok(found)
}
