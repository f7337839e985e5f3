use crate::catalogue::MessageCatalogue;
use crate::error::TranslationError;
use crate::formatter::Parameters;
use crate::loader::TranslationLoader;
use crate::resource::Resource;
use std::sync::Arc;

/// Lookup and registration surface shared by [`crate::BaseTranslator`] and
/// the decorating [`crate::Translator`].
///
/// `None` for a domain means `messages`; `None` for a locale means the
/// current locale.
pub trait Translate {
    /// # Errors
    /// Lookup failures are [`TranslationError::MissingMessage`] or
    /// [`TranslationError::InvalidArgument`]; loading failures propagate.
    fn trans(
        &mut self,
        id: &str,
        parameters: &Parameters,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<String, TranslationError>;

    /// # Errors
    /// Returns an error when the catalogue cannot be loaded.
    fn has_trans(
        &mut self,
        id: &str,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<bool, TranslationError>;

    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] or any loading failure.
    fn catalogue(&mut self, locale: Option<&str>) -> Result<Arc<MessageCatalogue>, TranslationError>;

    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale.
    fn add_resource(
        &mut self,
        format: &str,
        resource: Resource,
        locale: &str,
        domain: Option<&str>,
    ) -> Result<(), TranslationError>;

    fn add_loader(&mut self, format: &str, loader: Arc<dyn TranslationLoader>);
}
