//! Loaders turn a [`Resource`] into a [`MessageCatalogue`] for one locale and domain.

mod array;
mod caching;
mod database;
mod json;

pub use array::ArrayLoader;
pub use caching::{CachingTranslationLoader, ResourceCache};
pub use database::DatabaseTranslationLoader;
pub use json::JsonFileLoader;

use crate::catalogue::MessageCatalogue;
use crate::error::TranslationError;
use crate::resource::Resource;
use std::fmt::Debug;

/// Format tag of [`ArrayLoader`].
pub const ARRAY_FORMAT: &str = "array";
/// Format tag of [`JsonFileLoader`].
pub const JSON_FORMAT: &str = "json";

pub trait TranslationLoader: Send + Sync + Debug {
    /// Loads the messages of `resource` into a catalogue of `locale` under `domain`.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidResource`] when the resource kind is
    /// not handled by this loader, or the underlying read/parse error.
    fn load(
        &self,
        resource: &Resource,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, TranslationError>;
}

pub(crate) fn unsupported(loader: &'static str, resource: &Resource) -> TranslationError {
    TranslationError::InvalidResource {
        message: format!("{loader} cannot load {resource}").into(),
        context: None,
    }
}
