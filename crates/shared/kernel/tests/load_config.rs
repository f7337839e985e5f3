use rosetta_kernel::config::{ConfigError, load_config};
use rosetta_kernel::domain::config::{AppConfig, CompressionKind};
use std::fs;
use std::path::PathBuf;

#[test]
fn toml_file_populates_translator_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rosetta.toml");
    fs::write(
        &path,
        r#"
[translator]
default_locale = "fr"
cache_dir = "var/cache/translations"
compression = "lz4"
locales = ["en", "fr", "fr_FR"]

[translator.strategies.customer]
fr_CA = "fr"

[log]
level = "debug"
"#,
    )
    .unwrap();

    let cfg: AppConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.translator.default_locale, "fr");
    assert_eq!(cfg.translator.cache_dir, Some(PathBuf::from("var/cache/translations")));
    assert_eq!(cfg.translator.compression, CompressionKind::Lz4);
    assert_eq!(cfg.translator.strategies["customer"]["fr_CA"], "fr");
    assert_eq!(cfg.translator.resource_cache_capacity, 10_000);
    assert_eq!(cfg.log.level, "debug");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config::<AppConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
    assert!(err.to_string().contains("Failed to build config"));
}

#[test]
fn malformed_values_fail_to_deserialize() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rosetta.toml");
    fs::write(&path, "[translator]\ncompression = \"zstd\"\n").unwrap();

    let err = load_config::<AppConfig>(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}
