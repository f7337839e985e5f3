//! Tracking of database-backed translation resources.

use crate::base::BaseTranslator;
use crate::domain_provider::TranslationDomainProvider;
use crate::error::TranslationError;
use crate::fallback::unique_except;
use crate::metadata::DynamicTranslationMetadataCache;
use crate::resource::{DatabaseTranslationResource, Resource};
use crate::translate::Translate;
use rosetta_domain::constants::DATABASE_FORMAT;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// A runtime-changeable resource for one locale and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicResourceEntry {
    pub resource: Resource,
    pub format: String,
    pub code: String,
    pub domain: String,
}

/// Dynamic resources per locale, plus those already handed to the base translator.
#[derive(Debug, Default)]
pub struct DynamicResources {
    by_locale: BTreeMap<String, Vec<DynamicResourceEntry>>,
    registered: Vec<DynamicResourceEntry>,
}

impl DynamicResources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self, locale: &str) -> &[DynamicResourceEntry] {
        self.by_locale.get(locale).map_or(&[], Vec::as_slice)
    }

    /// Discovers the database resources of `locale` and of `fallback_locales`.
    ///
    /// Does nothing when `locale` already has a database resource. Returns the
    /// number of entries added.
    pub fn ensure_loaded(
        &mut self,
        locale: &str,
        fallback_locales: &[String],
        provider: &dyn TranslationDomainProvider,
        metadata: &Arc<DynamicTranslationMetadataCache>,
    ) -> usize {
        if self.entries(locale).iter().any(|entry| entry.format == DATABASE_FORMAT) {
            return 0;
        }

        let mut locales = vec![locale.to_owned()];
        locales.extend(unique_except(fallback_locales.to_vec(), locale));

        let mut added = 0;
        for found in provider.available_domains_for_locales(&locales) {
            let entry = DynamicResourceEntry {
                resource: Resource::Database(DatabaseTranslationResource::new(
                    found.code.clone(),
                    Arc::clone(metadata),
                )),
                format: DATABASE_FORMAT.to_owned(),
                code: found.code,
                domain: found.domain,
            };
            let entries = self.by_locale.entry(entry.code.clone()).or_default();
            if !entries.contains(&entry) {
                entries.push(entry);
                added += 1;
            }
        }
        debug!(locale, added, "Dynamic resources discovered");
        added
    }

    /// Whether every dynamic resource of `locale` is unchanged since `time`.
    #[must_use]
    pub fn is_fresh(&self, locale: &str, time: SystemTime) -> bool {
        self.entries(locale).iter().all(|entry| entry.resource.is_fresh(time))
    }

    /// Adds every entry not registered yet to `base`. Returns how many were added.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for an entry with a malformed code.
    pub fn register(&mut self, base: &mut BaseTranslator) -> Result<usize, TranslationError> {
        let mut added = 0;
        for entry in self.by_locale.values().flatten() {
            if self.registered.contains(entry) {
                continue;
            }
            base.add_resource(&entry.format, entry.resource.clone(), &entry.code, Some(&entry.domain))?;
            self.registered.push(entry.clone());
            added += 1;
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_provider::DomainEntry;

    #[derive(Debug)]
    struct Fixed(Vec<DomainEntry>);

    impl TranslationDomainProvider for Fixed {
        fn available_domains_for_locales(&self, locales: &[String]) -> Vec<DomainEntry> {
            self.0.iter().filter(|e| locales.contains(&e.code)).cloned().collect()
        }
    }

    #[test]
    fn discovery_covers_fallbacks_and_runs_once() {
        let metadata = Arc::new(DynamicTranslationMetadataCache::new());
        let provider = Fixed(vec![
            DomainEntry::new("fr", "messages"),
            DomainEntry::new("en", "messages"),
            DomainEntry::new("en", "jsmessages"),
            DomainEntry::new("de", "messages"),
        ]);
        let mut dynamic = DynamicResources::new();
        let fallbacks = vec!["en".to_owned(), "fr".to_owned()];

        assert_eq!(dynamic.ensure_loaded("fr", &fallbacks, &provider, &metadata), 3);
        assert_eq!(dynamic.entries("fr").len(), 1);
        assert_eq!(dynamic.entries("en").len(), 2);
        assert!(dynamic.entries("de").is_empty());

        assert_eq!(dynamic.ensure_loaded("fr", &fallbacks, &provider, &metadata), 0);
        // Discovered through `fr`, so `en` short-circuits.
        assert_eq!(dynamic.ensure_loaded("en", &fallbacks, &provider, &metadata), 0);
    }

    #[test]
    fn registration_is_idempotent() {
        let metadata = Arc::new(DynamicTranslationMetadataCache::new());
        let provider = Fixed(vec![DomainEntry::new("en", "messages")]);
        let mut dynamic = DynamicResources::new();
        let mut base = BaseTranslator::new("en").unwrap();

        dynamic.ensure_loaded("en", &[], &provider, &metadata);
        assert_eq!(dynamic.register(&mut base).unwrap(), 1);
        assert_eq!(dynamic.register(&mut base).unwrap(), 0);
        assert_eq!(base.resources("en").len(), 1);
        assert_eq!(base.resources("en")[0].format, DATABASE_FORMAT);
    }

    #[test]
    fn freshness_follows_the_metadata_cache() {
        let metadata = Arc::new(DynamicTranslationMetadataCache::new());
        let provider = Fixed(vec![DomainEntry::new("en", "messages")]);
        let mut dynamic = DynamicResources::new();
        dynamic.ensure_loaded("en", &[], &provider, &metadata);

        let dumped_at = SystemTime::now();
        assert!(dynamic.is_fresh("en", dumped_at));
        metadata.set_timestamp("en", dumped_at + std::time::Duration::from_secs(1));
        assert!(!dynamic.is_fresh("en", dumped_at));
    }
}
