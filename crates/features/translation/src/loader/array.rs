use super::{TranslationLoader, unsupported};
use crate::catalogue::MessageCatalogue;
use crate::error::TranslationError;
use crate::resource::Resource;

/// Loads in-memory [`Resource::Messages`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayLoader;

impl TranslationLoader for ArrayLoader {
    fn load(
        &self,
        resource: &Resource,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, TranslationError> {
        let Resource::Messages(messages) = resource else {
            return Err(unsupported("ArrayLoader", resource));
        };
        let mut catalogue = MessageCatalogue::new(locale);
        catalogue.add(messages.as_ref().clone(), domain);
        Ok(catalogue)
    }
}
