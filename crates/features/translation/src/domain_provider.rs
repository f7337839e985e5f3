use std::fmt::Debug;

/// One domain with stored translations for a locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainEntry {
    pub code: String,
    pub domain: String,
}

impl DomainEntry {
    #[must_use]
    pub fn new(code: impl Into<String>, domain: impl Into<String>) -> Self {
        Self { code: code.into(), domain: domain.into() }
    }
}

/// Lists the domains holding runtime-editable translations.
pub trait TranslationDomainProvider: Send + Sync + Debug {
    /// Domains available for any of `locales`, reported under their own locale code.
    fn available_domains_for_locales(&self, locales: &[String]) -> Vec<DomainEntry>;
}
