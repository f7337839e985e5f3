use config::{Config, Environment, File};
use rosetta_domain::constants::{CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[rosetta_derive::rosetta_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file layered under environment overrides.
///
/// 1. **Base file**: `path` when given (must exist), otherwise an optional
///    `rosetta.{toml,json,yaml,...}` in the working directory.
/// 2. **Environment**: variables prefixed with `ROSETTA__`, nested with double
///    underscores (`ROSETTA__TRANSLATOR__CACHE_DIR` maps to `translator.cache_dir`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or the merged
/// values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use rosetta_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     debug: bool,
/// }
///
/// let cfg: Settings = load_config(Some("config/missing.toml")).unwrap_or_default();
/// assert!(!cfg.debug);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading configuration");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
