use crate::catalogue::Messages;
use crate::domain_provider::{DomainEntry, TranslationDomainProvider};
use crate::error::TranslationError;
use crate::metadata::DynamicTranslationMetadataCache;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Source of runtime-editable translations.
pub trait TranslationRepository: Send + Sync + Debug {
    /// Every message of `domain` stored for `locale`.
    ///
    /// # Errors
    /// Implementations report backend failures as [`TranslationError::Service`].
    fn find_messages(&self, locale: &str, domain: &str) -> Result<Messages, TranslationError>;
}

/// Repository and domain provider backed by a map; used by the CLI and tests.
///
/// Writes bump the timestamp of the locale in the attached metadata cache so
/// compiled catalogues of that locale go stale.
#[derive(Debug, Default)]
pub struct InMemoryTranslationRepository {
    messages: RwLock<BTreeMap<(String, String), Messages>>,
    metadata: Option<Arc<DynamicTranslationMetadataCache>>,
}

impl InMemoryTranslationRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metadata(metadata: Arc<DynamicTranslationMetadataCache>) -> Self {
        Self { messages: RwLock::default(), metadata: Some(metadata) }
    }

    pub fn set_message(
        &self,
        locale: &str,
        domain: &str,
        id: impl Into<String>,
        translation: impl Into<String>,
    ) {
        self.messages
            .write()
            .entry((locale.to_owned(), domain.to_owned()))
            .or_default()
            .insert(id.into(), translation.into());
        if let Some(metadata) = &self.metadata {
            metadata.update_timestamp(locale);
        }
    }

    pub fn remove_message(&self, locale: &str, domain: &str, id: &str) -> bool {
        let removed = self
            .messages
            .write()
            .get_mut(&(locale.to_owned(), domain.to_owned()))
            .is_some_and(|messages| messages.remove(id).is_some());
        if removed && let Some(metadata) = &self.metadata {
            metadata.update_timestamp(locale);
        }
        removed
    }
}

impl TranslationRepository for InMemoryTranslationRepository {
    fn find_messages(&self, locale: &str, domain: &str) -> Result<Messages, TranslationError> {
        Ok(self
            .messages
            .read()
            .get(&(locale.to_owned(), domain.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

impl TranslationDomainProvider for InMemoryTranslationRepository {
    fn available_domains_for_locales(&self, locales: &[String]) -> Vec<DomainEntry> {
        let messages = self.messages.read();
        locales
            .iter()
            .flat_map(|locale| {
                messages
                    .range((locale.clone(), String::new())..)
                    .take_while(move |((code, _), _)| code == locale)
                    .map(|((code, domain), _)| DomainEntry::new(code.clone(), domain.clone()))
            })
            .collect()
    }
}
