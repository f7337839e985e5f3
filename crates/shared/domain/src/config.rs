use crate::constants::DEFAULT_LOCALE;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the CLI and library consumers.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub translator: TranslatorConfig,
    pub log: LogConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Compression applied to compiled catalogue artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    #[default]
    None,
    Lz4,
}

/// Translator and catalogue cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub default_locale: String,
    /// Directory of compiled catalogues; caching is disabled when absent.
    pub cache_dir: Option<PathBuf>,
    /// Recompile artifacts whose source files changed after they were dumped.
    pub debug: bool,
    pub compression: CompressionKind,
    /// Directories scanned for `<domain>.<locale>.<format>` files.
    pub resource_dirs: Vec<PathBuf>,
    /// Upper bound of loaded resources kept by the resource cache; `0` disables it.
    pub resource_cache_capacity: u64,
    pub installed: bool,
    /// Track database-backed translations and their update timestamps.
    pub dynamic_resources: bool,
    /// Strategy selected on startup; the first registered one otherwise.
    pub strategy: Option<String>,
    /// Locales enabled for the default strategy.
    pub locales: Vec<String>,
    /// Additional strategies given as `locale -> parent locale` maps.
    pub strategies: BTreeMap<String, BTreeMap<String, String>>,
    /// Extra inputs folded into the cache fingerprint.
    pub cache_vary: BTreeMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_owned(),
            cache_dir: None,
            debug: false,
            compression: CompressionKind::None,
            resource_dirs: Vec::new(),
            resource_cache_capacity: 10_000,
            installed: true,
            dynamic_resources: true,
            strategy: None,
            locales: vec![DEFAULT_LOCALE.to_owned()],
            strategies: BTreeMap::new(),
            cache_vary: BTreeMap::new(),
        }
    }
}

/// Logging sink settings consumed by binaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Explicit filter directives; `RUST_LOG` is used when absent.
    pub filter: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, dir: None, json: false }
    }
}
