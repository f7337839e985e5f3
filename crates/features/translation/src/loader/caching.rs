use super::TranslationLoader;
use crate::catalogue::MessageCatalogue;
use crate::error::TranslationError;
use crate::resource::Resource;
use moka::sync::Cache;
use std::sync::Arc;
use tracing::trace;

/// Shared cache of loaded file resources, keyed by path, locale and domain.
#[derive(Debug, Clone)]
pub struct ResourceCache {
    inner: Cache<String, Arc<MessageCatalogue>>,
}

impl ResourceCache {
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self { inner: Cache::builder().name("translation-resources").max_capacity(capacity).build() }
    }

    /// Drops every cached resource so the next load reads the sources again.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        trace!("Resource cache cleared");
    }

    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

/// Wraps a loader so the same file is parsed once per locale and domain.
///
/// Only [`Resource::File`] results are cached; other resources pass through.
#[derive(Debug, Clone)]
pub struct CachingTranslationLoader {
    inner: Arc<dyn TranslationLoader>,
    cache: ResourceCache,
}

impl CachingTranslationLoader {
    #[must_use]
    pub fn new(inner: Arc<dyn TranslationLoader>, cache: ResourceCache) -> Self {
        Self { inner, cache }
    }
}

impl TranslationLoader for CachingTranslationLoader {
    fn load(
        &self,
        resource: &Resource,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, TranslationError> {
        let Some(path) = resource.as_path() else {
            return self.inner.load(resource, locale, domain);
        };

        let key = format!("{}|{locale}|{domain}", path.display());
        let cached = self
            .cache
            .inner
            .try_get_with(key, || self.inner.load(resource, locale, domain).map(Arc::new))
            .map_err(|err| Arc::try_unwrap(err).unwrap_or_else(|shared| rewrap(&shared)))?;
        Ok(cached.as_ref().clone())
    }
}

fn rewrap(err: &TranslationError) -> TranslationError {
    TranslationError::InvalidResource { message: err.to_string().into(), context: None }
}
