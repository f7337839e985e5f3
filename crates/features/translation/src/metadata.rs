use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::time::SystemTime;
use tracing::debug;

/// Last update time of database-backed translations, per locale.
///
/// Writers of the translation repository bump the timestamp of a locale so
/// compiled catalogues older than it are thrown away on next load.
#[derive(Debug, Default)]
pub struct DynamicTranslationMetadataCache {
    timestamps: RwLock<FxHashMap<String, SystemTime>>,
}

impl DynamicTranslationMetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks translations of `locale` as changed now.
    pub fn update_timestamp(&self, locale: &str) {
        self.set_timestamp(locale, SystemTime::now());
    }

    pub fn set_timestamp(&self, locale: &str, at: SystemTime) {
        debug!(locale, "Dynamic translations updated");
        self.timestamps.write().insert(locale.to_owned(), at);
    }

    #[must_use]
    pub fn timestamp(&self, locale: &str) -> Option<SystemTime> {
        self.timestamps.read().get(locale).copied()
    }

    pub fn clear(&self) {
        self.timestamps.write().clear();
    }
}
