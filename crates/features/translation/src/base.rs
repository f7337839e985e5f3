//! The undecorated translator: loaders, resources, catalogue compilation and
//! the artifact cache.

use crate::artifact::{CacheVary, CompiledArtifactStore};
use crate::catalogue::MessageCatalogue;
use crate::error::TranslationError;
use crate::fallback::{FallbackResolver, ParentLocaleFallback};
use crate::formatter::{MessageFormatter, Parameters};
use crate::loader::TranslationLoader;
use crate::options::ResourceFileName;
use crate::resource::Resource;
use crate::translate::Translate;
use rosetta_domain::constants::DEFAULT_DOMAIN;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

/// A resource as registered for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredResource {
    pub format: String,
    pub resource: Resource,
    pub domain: String,
}

/// Extension points around the compilation of one catalogue.
pub trait CompileHooks {
    /// Runs before the resources of a locale are loaded.
    ///
    /// # Errors
    /// Aborts the compilation.
    fn before_compile(&mut self, base: &mut BaseTranslator) -> Result<(), TranslationError>;

    /// Runs on the own messages of a freshly compiled catalogue.
    fn after_compile(&mut self, catalogue: &mut MessageCatalogue);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl CompileHooks for NoHooks {
    fn before_compile(&mut self, _base: &mut BaseTranslator) -> Result<(), TranslationError> {
        Ok(())
    }

    fn after_compile(&mut self, _catalogue: &mut MessageCatalogue) {}
}

/// # Errors
/// Returns [`TranslationError::InvalidLocale`] unless `locale` is made of
/// ASCII letters, digits, `@`, `_`, `.` and `-`.
pub fn validate_locale(locale: &str) -> Result<(), TranslationError> {
    let valid = !locale.is_empty()
        && locale.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(TranslationError::InvalidLocale { message: format!("'{locale}'").into(), context: None })
    }
}

/// Loads catalogues from registered resources and, with a store, persists them.
#[derive(Debug)]
pub struct BaseTranslator {
    locale: String,
    fallback_locales: Vec<String>,
    fallback_resolver: Arc<dyn FallbackResolver>,
    formatter: MessageFormatter,
    loaders: BTreeMap<String, Arc<dyn TranslationLoader>>,
    resources: BTreeMap<String, Vec<RegisteredResource>>,
    /// Files registered on the next [`Self::initialize`].
    resource_files: BTreeMap<String, Vec<PathBuf>>,
    catalogues: BTreeMap<String, Arc<MessageCatalogue>>,
    store: Option<Arc<dyn CompiledArtifactStore>>,
    debug: bool,
    vary: CacheVary,
}

impl BaseTranslator {
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale.
    pub fn new(locale: impl Into<String>) -> Result<Self, TranslationError> {
        let locale = locale.into();
        validate_locale(&locale)?;
        Ok(Self {
            locale,
            fallback_locales: Vec::new(),
            fallback_resolver: Arc::new(ParentLocaleFallback),
            formatter: MessageFormatter::new(),
            loaders: BTreeMap::new(),
            resources: BTreeMap::new(),
            resource_files: BTreeMap::new(),
            catalogues: BTreeMap::new(),
            store: None,
            debug: false,
            vary: CacheVary::new(),
        })
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale.
    pub fn set_locale(&mut self, locale: impl Into<String>) -> Result<(), TranslationError> {
        let locale = locale.into();
        validate_locale(&locale)?;
        self.locale = locale;
        Ok(())
    }

    #[must_use]
    pub fn fallback_locales(&self) -> &[String] {
        &self.fallback_locales
    }

    /// Replaces the configured fallback locales and drops every loaded catalogue.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale.
    pub fn set_fallback_locales(&mut self, locales: Vec<String>) -> Result<(), TranslationError> {
        for locale in &locales {
            validate_locale(locale)?;
        }
        self.catalogues.clear();
        self.fallback_locales = locales;
        Ok(())
    }

    pub fn set_fallback_resolver(&mut self, resolver: Arc<dyn FallbackResolver>) {
        self.fallback_resolver = resolver;
        self.catalogues.clear();
    }

    /// Fallback chain of `locale`, nearest first, without `locale` itself.
    #[must_use]
    pub fn compute_fallback_locales(&self, locale: &str) -> Vec<String> {
        self.fallback_resolver.fallback_locales(locale, &self.fallback_locales)
    }

    pub fn set_store(&mut self, store: Option<Arc<dyn CompiledArtifactStore>>) {
        self.store = store;
    }

    #[must_use]
    pub fn store(&self) -> Option<&Arc<dyn CompiledArtifactStore>> {
        self.store.as_ref()
    }

    pub const fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    #[must_use]
    pub const fn vary(&self) -> &CacheVary {
        &self.vary
    }

    pub fn set_vary(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.vary.insert(key.into(), value);
    }

    /// Queues files registered on the next [`Self::initialize`].
    pub fn add_resource_files(&mut self, files: BTreeMap<String, Vec<PathBuf>>) {
        for (locale, paths) in files {
            self.resource_files.entry(locale).or_default().extend(paths);
        }
    }

    #[must_use]
    pub fn resources(&self, locale: &str) -> &[RegisteredResource] {
        self.resources.get(locale).map_or(&[], Vec::as_slice)
    }

    /// Every registered resource with its locale.
    pub fn all_resources(&self) -> impl Iterator<Item = (&str, &RegisteredResource)> {
        self.resources
            .iter()
            .flat_map(|(locale, entries)| entries.iter().map(move |entry| (locale.as_str(), entry)))
    }

    /// Registers the queued resource files.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidResource`] for a file name outside the
    /// `<domain>.<locale>.<format>` layout.
    pub fn initialize(&mut self) -> Result<(), TranslationError> {
        let files = std::mem::take(&mut self.resource_files);
        for path in files.into_values().flatten() {
            let Some(name) = ResourceFileName::parse(&path) else {
                return Err(TranslationError::InvalidResource {
                    message: format!("'{}' is not named <domain>.<locale>.<format>", path.display())
                        .into(),
                    context: None,
                });
            };
            validate_locale(&name.locale)?;
            trace!(path = %path.display(), locale = name.locale, "Resource file registered");
            self.resources.entry(name.locale).or_default().push(RegisteredResource {
                format: name.format,
                resource: Resource::File(path),
                domain: name.domain,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn loaded(&self, locale: &str) -> Option<Arc<MessageCatalogue>> {
        self.catalogues.get(locale).cloned()
    }

    /// Loaded catalogues of the given locales.
    #[must_use]
    pub fn loaded_for(&self, locales: &[String]) -> Vec<(String, Arc<MessageCatalogue>)> {
        locales
            .iter()
            .filter_map(|locale| self.loaded(locale).map(|c| (locale.clone(), c)))
            .collect()
    }

    /// Puts back catalogues that are no longer loaded.
    pub fn restore_catalogues(&mut self, catalogues: Vec<(String, Arc<MessageCatalogue>)>) {
        for (locale, catalogue) in catalogues {
            self.catalogues.entry(locale).or_insert(catalogue);
        }
    }

    pub fn clear_catalogues(&mut self) {
        self.catalogues.clear();
    }

    /// The catalogue of `locale` with its fallback chain, loaded if needed.
    ///
    /// With a store, a fresh artifact is read instead of compiling; a compiled
    /// catalogue is written back as a new artifact.
    ///
    /// # Errors
    /// Propagates loader, store and hook failures.
    pub fn load_catalogue(
        &mut self,
        locale: &str,
        hooks: &mut dyn CompileHooks,
    ) -> Result<Arc<MessageCatalogue>, TranslationError> {
        if let Some(catalogue) = self.loaded(locale) {
            return Ok(catalogue);
        }

        let Some(store) = self.store.clone() else {
            return self.initialize_catalogue(locale, hooks);
        };

        let path = store.path_for(locale, &self.vary)?;
        if let Some(dumped_at) = store.modified(&path)?
            && self.is_artifact_fresh(locale, dumped_at)?
        {
            let catalogue = store.read(&path)?;
            self.catalogues.insert(locale.to_owned(), Arc::clone(&catalogue));
            return Ok(catalogue);
        }

        let catalogue = self.initialize_catalogue(locale, hooks)?;
        store.write(&path, &catalogue)?;
        Ok(catalogue)
    }

    /// Compiles `locale` from its resources and chains its fallbacks.
    ///
    /// # Errors
    /// Returns [`TranslationError::MissingLoader`] when a resource format has no
    /// loader, or the failure of a loader or hook.
    pub fn initialize_catalogue(
        &mut self,
        locale: &str,
        hooks: &mut dyn CompileHooks,
    ) -> Result<Arc<MessageCatalogue>, TranslationError> {
        hooks.before_compile(self)?;
        self.initialize()?;

        let mut catalogue = MessageCatalogue::new(locale);
        for entry in self.resources(locale).to_vec() {
            let loader = self.loaders.get(&entry.format).ok_or_else(|| {
                TranslationError::MissingLoader {
                    message: format!("no loader registered for format '{}'", entry.format).into(),
                    context: Some(format!("resource {}", entry.resource).into()),
                }
            })?;
            let loaded = loader.load(&entry.resource, locale, &entry.domain)?;
            catalogue.add_catalogue(&loaded)?;
        }
        hooks.after_compile(&mut catalogue);

        // Registered before the fallbacks so a cyclic chain stops here.
        self.catalogues.insert(locale.to_owned(), Arc::new(catalogue.clone()));

        let fallbacks = self.compute_fallback_locales(locale);
        for fallback in &fallbacks {
            if !self.catalogues.contains_key(fallback) {
                self.initialize_catalogue(fallback, hooks)?;
            }
        }

        let mut chain: Option<MessageCatalogue> = None;
        for fallback in fallbacks.iter().rev() {
            let mut link = self
                .catalogues
                .get(fallback)
                .map_or_else(|| MessageCatalogue::new(fallback.clone()), |c| c.detached());
            if let Some(next) = chain.take() {
                link.set_fallback_catalogue(next);
            }
            chain = Some(link);
        }
        if let Some(chain) = chain {
            catalogue.set_fallback_catalogue(chain);
        }

        debug!(locale, messages = catalogue.len(), fallbacks = fallbacks.len(), "Catalogue compiled");
        let catalogue = Arc::new(catalogue);
        self.catalogues.insert(locale.to_owned(), Arc::clone(&catalogue));
        Ok(catalogue)
    }

    /// Outside debug mode an existing artifact is always used.
    fn is_artifact_fresh(&mut self, locale: &str, dumped_at: SystemTime) -> Result<bool, TranslationError> {
        if !self.debug {
            return Ok(true);
        }
        self.initialize()?;
        let mut locales = vec![locale.to_owned()];
        locales.extend(self.compute_fallback_locales(locale));
        let fresh = locales
            .iter()
            .flat_map(|l| self.resources(l))
            .all(|entry| entry.resource.is_fresh(dumped_at));
        if !fresh {
            debug!(locale, "Artifact is older than its resources");
        }
        Ok(fresh)
    }

    fn resolve_locale<'a>(&'a self, locale: Option<&'a str>) -> Result<&'a str, TranslationError> {
        let locale = locale.unwrap_or(&self.locale);
        validate_locale(locale)?;
        Ok(locale)
    }
}

impl Translate for BaseTranslator {
    fn trans(
        &mut self,
        id: &str,
        parameters: &Parameters,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<String, TranslationError> {
        if id.is_empty() {
            return Ok(String::new());
        }
        let domain = domain.unwrap_or(DEFAULT_DOMAIN);
        let catalogue = self.catalogue(locale)?;
        let (found_in, message) = catalogue
            .chain()
            .find_map(|c| c.domain(domain).and_then(|m| m.get(id)).map(|m| (c.locale(), m)))
            .ok_or_else(|| TranslationError::MissingMessage {
                message: format!("'{id}' in domain '{domain}'").into(),
                context: Some(format!("locale '{}'", catalogue.locale()).into()),
            })?;
        self.formatter.format(message, found_in, parameters)
    }

    fn has_trans(
        &mut self,
        id: &str,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<bool, TranslationError> {
        let catalogue = self.catalogue(locale)?;
        Ok(catalogue.has(id, domain.unwrap_or(DEFAULT_DOMAIN)))
    }

    fn catalogue(&mut self, locale: Option<&str>) -> Result<Arc<MessageCatalogue>, TranslationError> {
        let locale = self.resolve_locale(locale)?.to_owned();
        self.load_catalogue(&locale, &mut NoHooks)
    }

    fn add_resource(
        &mut self,
        format: &str,
        resource: Resource,
        locale: &str,
        domain: Option<&str>,
    ) -> Result<(), TranslationError> {
        validate_locale(locale)?;
        self.resources.entry(locale.to_owned()).or_default().push(RegisteredResource {
            format: format.to_owned(),
            resource,
            domain: domain.unwrap_or(DEFAULT_DOMAIN).to_owned(),
        });

        if self.fallback_locales.iter().any(|l| l == locale) {
            self.catalogues.clear();
        } else {
            self.catalogues.remove(locale);
        }
        Ok(())
    }

    fn add_loader(&mut self, format: &str, loader: Arc<dyn TranslationLoader>) {
        self.loaders.insert(format.to_owned(), loader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{ARRAY_FORMAT, ArrayLoader};

    fn base() -> BaseTranslator {
        let mut base = BaseTranslator::new("fr_FR").unwrap();
        base.add_loader(ARRAY_FORMAT, Arc::new(ArrayLoader));
        base.set_fallback_locales(vec!["en".into()]).unwrap();
        base
    }

    #[test]
    fn locales_are_validated() {
        assert!(BaseTranslator::new("fr_FR@euro").is_ok());
        assert_eq!(BaseTranslator::new("fr FR").unwrap_err().kind(), "InvalidLocale");
        assert_eq!(base().set_locale("../etc").unwrap_err().kind(), "InvalidLocale");
    }

    #[test]
    fn messages_resolve_through_parent_and_configured_fallbacks() {
        let mut base = base();
        base.add_resource(ARRAY_FORMAT, Resource::messages([("a", "A en"), ("b", "B en")]), "en", None).unwrap();
        base.add_resource(ARRAY_FORMAT, Resource::messages([("b", "B fr")]), "fr", None).unwrap();
        base.add_resource(ARRAY_FORMAT, Resource::messages([("c", "C %x%")]), "fr_FR", None).unwrap();

        let params = Parameters::from([("%x%".to_owned(), "!".to_owned())]);
        assert_eq!(base.trans("a", &Parameters::new(), None, None).unwrap(), "A en");
        assert_eq!(base.trans("b", &Parameters::new(), None, None).unwrap(), "B fr");
        assert_eq!(base.trans("c", &params, None, None).unwrap(), "C !");
        assert_eq!(base.trans("", &params, None, None).unwrap(), "");

        let catalogue = base.catalogue(None).unwrap();
        let locales: Vec<_> = catalogue.chain().map(MessageCatalogue::locale).collect();
        assert_eq!(locales, ["fr_FR", "fr", "en"]);
    }

    #[test]
    fn missing_messages_and_loaders_are_errors() {
        let mut base = base();
        let err = base.trans("nope", &Parameters::new(), None, None).unwrap_err();
        assert!(err.is_lookup());

        base.add_resource("yaml", Resource::file("/x/messages.fr_FR.yaml"), "fr_FR", None).unwrap();
        let err = base.catalogue(None).unwrap_err();
        assert_eq!(err.kind(), "MissingLoader");
    }

    #[test]
    fn adding_a_resource_reloads_the_catalogue() {
        let mut base = base();
        base.add_resource(ARRAY_FORMAT, Resource::messages([("a", "first")]), "fr_FR", None).unwrap();
        assert_eq!(base.trans("a", &Parameters::new(), None, None).unwrap(), "first");

        base.add_resource(ARRAY_FORMAT, Resource::messages([("a", "second")]), "fr_FR", None).unwrap();
        assert_eq!(base.trans("a", &Parameters::new(), None, None).unwrap(), "second");
    }

    #[test]
    fn cyclic_fallbacks_terminate() {
        let mut base = BaseTranslator::new("a").unwrap();
        base.add_loader(ARRAY_FORMAT, Arc::new(ArrayLoader));
        base.set_fallback_locales(vec!["a".into(), "b".into()]).unwrap();
        base.add_resource(ARRAY_FORMAT, Resource::messages([("x", "from b")]), "b", None).unwrap();

        assert_eq!(base.trans("x", &Parameters::new(), None, Some("a")).unwrap(), "from b");
        let b = base.catalogue(Some("b")).unwrap();
        assert_eq!(b.chain().count(), 2);
    }

    #[test]
    fn resource_files_need_the_domain_locale_format_layout() {
        let mut base = base();
        base.add_resource_files(BTreeMap::from([("en".to_owned(), vec![PathBuf::from("/t/readme")])]));
        assert_eq!(base.initialize().unwrap_err().kind(), "InvalidResource");
    }
}
