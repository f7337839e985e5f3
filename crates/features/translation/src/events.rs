//! Events published on the [`rosetta_event_bus::EventBus`] by the translator.

use crate::catalogue::MessageCatalogue;
use std::sync::Arc;

/// A catalogue was compiled because no artifact existed for it.
#[derive(Debug, Clone)]
pub struct AfterCatalogueDump {
    pub catalogue: Arc<MessageCatalogue>,
}

impl AfterCatalogueDump {
    pub const NAME: &'static str = "translation.after_catalogue_dump";
}

/// Compiled catalogues were removed or replaced.
///
/// `locale` is `None` when every locale is affected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidateTranslationCacheEvent {
    pub locale: Option<String>,
}

impl InvalidateTranslationCacheEvent {
    pub const NAME: &'static str = "translation.invalidate_cache";

    #[must_use]
    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self { locale: Some(locale.into()) }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self { locale: None }
    }
}
