use super::{TranslationLoader, unsupported};
use crate::catalogue::MessageCatalogue;
use crate::error::TranslationError;
use crate::repository::TranslationRepository;
use crate::resource::Resource;
use std::sync::Arc;
use tracing::debug;

/// Loads [`Resource::Database`] entries through a [`TranslationRepository`].
#[derive(Debug, Clone)]
pub struct DatabaseTranslationLoader {
    repository: Arc<dyn TranslationRepository>,
}

impl DatabaseTranslationLoader {
    #[must_use]
    pub fn new(repository: Arc<dyn TranslationRepository>) -> Self {
        Self { repository }
    }
}

impl TranslationLoader for DatabaseTranslationLoader {
    fn load(
        &self,
        resource: &Resource,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, TranslationError> {
        let Resource::Database(_) = resource else {
            return Err(unsupported("DatabaseTranslationLoader", resource));
        };
        let messages = self.repository.find_messages(locale, domain)?;
        debug!(locale, domain, count = messages.len(), "Loaded database translations");

        let mut catalogue = MessageCatalogue::new(locale);
        catalogue.add(messages, domain);
        Ok(catalogue)
    }
}
