//! Wires configuration into a ready [`Translator`].

use anyhow::{Context, Result};
use rosetta_domain::config::AppConfig;
use rosetta_domain::constants::DATABASE_FORMAT;
use rosetta_translation::{
    ARRAY_FORMAT, ArrayLoader, DatabaseTranslationLoader, DynamicTranslationMetadataCache,
    InMemoryTranslationRepository, JSON_FORMAT, JsonFileLoader, StaticApplicationState,
    StrategyProvider, TranslationStrategyProvider, Translator, TranslatorOptions,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// `locale -> domain -> id -> text`
type Seed = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// Builds the translator described by `config`. A database seed is only read
/// when dynamic resources are enabled.
pub(crate) fn bootstrap(
    config: &AppConfig,
    strategy: Option<&str>,
    database: Option<&Path>,
) -> Result<Translator> {
    let settings = &config.translator;

    let strategies = TranslationStrategyProvider::from_config(settings)
        .context("Invalid translation strategies")?;
    if let Some(name) = strategy {
        strategies.set_strategy_by_name(name)?;
    }
    let options = TranslatorOptions::from_config(settings).context("Failed to scan resource directories")?;
    debug!(locales = options.resource_files.len(), "Resource files discovered");

    let mut builder = Translator::builder(Arc::new(strategies))
        .locale(settings.default_locale.clone())
        .options(options)
        .application_state(Arc::new(StaticApplicationState(settings.installed)))
        .loader(JSON_FORMAT, Arc::new(JsonFileLoader))
        .loader(ARRAY_FORMAT, Arc::new(ArrayLoader));

    if settings.dynamic_resources {
        let metadata = Arc::new(DynamicTranslationMetadataCache::new());
        let repository =
            Arc::new(InMemoryTranslationRepository::with_metadata(Arc::clone(&metadata)));
        if let Some(path) = database {
            seed_repository(&repository, &metadata, path)?;
        }
        builder = builder
            .domain_provider(repository.clone())
            .metadata(metadata)
            .loader(DATABASE_FORMAT, Arc::new(DatabaseTranslationLoader::new(repository)));
    }

    Ok(builder.build()?)
}

/// Loads `path` into the repository, dating every locale at the file's mtime.
fn seed_repository(
    repository: &InMemoryTranslationRepository,
    metadata: &DynamicTranslationMetadataCache,
    path: &Path,
) -> Result<()> {
    let raw = std::fs::read(path)
        .with_context(|| format!("Failed to read translation database {}", path.display()))?;
    let seed: Seed = serde_json::from_slice(&raw)
        .with_context(|| format!("Invalid translation database {}", path.display()))?;
    let updated_at = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or_else(|_| SystemTime::now());

    let mut messages = 0;
    for (locale, domains) in &seed {
        for (domain, entries) in domains {
            for (id, text) in entries {
                repository.set_message(locale, domain, id.as_str(), text.as_str());
                messages += 1;
            }
        }
        metadata.set_timestamp(locale, updated_at);
    }
    info!(locales = seed.len(), messages, "Translation database seeded");
    Ok(())
}
