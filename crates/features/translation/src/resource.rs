use crate::catalogue::Messages;
use crate::metadata::DynamicTranslationMetadataCache;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// A translation source registered for one locale and domain.
#[derive(Debug, Clone)]
pub enum Resource {
    /// A file on disk, parsed by the loader of its format.
    File(PathBuf),
    /// Messages held in memory.
    Messages(Arc<Messages>),
    /// Translations stored in the translation repository.
    Database(DatabaseTranslationResource),
}

impl Resource {
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    #[must_use]
    pub fn messages<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Messages(Arc::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()))
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }

    /// Whether the content of this resource is unchanged since `time`.
    ///
    /// In-memory resources are always fresh. A file that cannot be inspected is stale.
    #[must_use]
    pub fn is_fresh(&self, time: SystemTime) -> bool {
        match self {
            Self::File(path) => std::fs::metadata(path)
                .and_then(|meta| meta.modified())
                .is_ok_and(|modified| modified <= time),
            Self::Messages(_) => true,
            Self::Database(resource) => resource.is_fresh(time),
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::File(a), Self::File(b)) => a == b,
            (Self::Messages(a), Self::Messages(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Database(a), Self::Database(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Resource {}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Messages(messages) => write!(f, "<{} in-memory messages>", messages.len()),
            Self::Database(resource) => write!(f, "database:{}", resource.locale()),
        }
    }
}

/// Database translations of one locale, fresh until the metadata cache
/// records a newer update.
#[derive(Debug, Clone)]
pub struct DatabaseTranslationResource {
    locale: String,
    metadata: Arc<DynamicTranslationMetadataCache>,
}

impl DatabaseTranslationResource {
    #[must_use]
    pub fn new(locale: impl Into<String>, metadata: Arc<DynamicTranslationMetadataCache>) -> Self {
        Self { locale: locale.into(), metadata }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Fresh when no update was recorded or the last update is not newer than `time`.
    #[must_use]
    pub fn is_fresh(&self, time: SystemTime) -> bool {
        self.metadata.timestamp(&self.locale).is_none_or(|updated| updated <= time)
    }
}

impl PartialEq for DatabaseTranslationResource {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale && Arc::ptr_eq(&self.metadata, &other.metadata)
    }
}

impl Eq for DatabaseTranslationResource {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn database_resource_freshness_follows_metadata() {
        let metadata = Arc::new(DynamicTranslationMetadataCache::new());
        let resource = DatabaseTranslationResource::new("fr", Arc::clone(&metadata));
        let dumped_at = SystemTime::now();

        assert!(resource.is_fresh(dumped_at));

        metadata.set_timestamp("fr", dumped_at - Duration::from_secs(5));
        assert!(resource.is_fresh(dumped_at));

        metadata.set_timestamp("fr", dumped_at + Duration::from_secs(5));
        assert!(!resource.is_fresh(dumped_at));

        metadata.set_timestamp("de", dumped_at + Duration::from_secs(60));
        let de = DatabaseTranslationResource::new("de", Arc::clone(&metadata));
        assert!(!de.is_fresh(dumped_at));
    }

    #[test]
    fn database_resources_compare_by_metadata_identity() {
        let shared = Arc::new(DynamicTranslationMetadataCache::new());
        let a = DatabaseTranslationResource::new("en", Arc::clone(&shared));
        let b = DatabaseTranslationResource::new("en", Arc::clone(&shared));
        let other = DatabaseTranslationResource::new("en", Arc::new(DynamicTranslationMetadataCache::new()));

        assert_eq!(a, b);
        assert_ne!(a, other);
    }

    #[test]
    fn missing_files_are_stale() {
        assert!(!Resource::file("/definitely/not/here.json").is_fresh(SystemTime::now()));
        assert!(Resource::messages([("a", "b")]).is_fresh(SystemTime::UNIX_EPOCH));
    }
}
