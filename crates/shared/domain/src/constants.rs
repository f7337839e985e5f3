/// Locale every fallback chain ends in when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Domain used when a lookup does not name one.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Format tag of resources backed by the translation repository.
pub const DATABASE_FORMAT: &str = "database";

/// Key of the locale chain inside the cache vary fingerprint.
pub const FALLBACK_LOCALES_VARY: &str = "fallback_locales";

/// Default file name (without extension) looked up by the configuration loader.
pub const CONFIG_FILE: &str = "rosetta";

/// Prefix of environment overrides, e.g. `ROSETTA__TRANSLATOR__DEBUG=true`.
pub const ENV_PREFIX: &str = "ROSETTA";
