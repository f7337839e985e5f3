//! The decorating [`Translator`]: strategy-driven fallbacks, dynamic
//! resources and the compiled catalogue cache lifecycle on top of a
//! [`BaseTranslator`].

use crate::artifact::FsArtifactStore;
use crate::base::{BaseTranslator, CompileHooks, RegisteredResource, validate_locale};
use crate::catalogue::{DomainMessages, MessageCatalogue};
use crate::domain_provider::TranslationDomainProvider;
use crate::dynamic::DynamicResources;
use crate::error::TranslationError;
use crate::events::{AfterCatalogueDump, InvalidateTranslationCacheEvent};
use crate::fallback::{StrategyFallback, unique};
use crate::formatter::{COUNT, Parameters, replace_parameters};
use crate::loader::{CachingTranslationLoader, ResourceCache, TranslationLoader};
use crate::metadata::DynamicTranslationMetadataCache;
use crate::options::TranslatorOptions;
use crate::resource::Resource;
use crate::sanitizer::{HtmlMessageSanitizer, MessageCatalogueSanitizer};
use crate::state::{ApplicationState, StaticApplicationState, StrategyState};
use crate::strategy::StrategyProvider;
use crate::translate::Translate;
use rosetta_domain::constants::{DEFAULT_LOCALE, FALLBACK_LOCALES_VARY};
use rosetta_event_bus::EventBus;
use rosetta_storage::Storage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Translation entry point owning every catalogue cache of the process.
#[derive(Debug)]
pub struct Translator {
    base: BaseTranslator,
    options: TranslatorOptions,
    strategy_provider: Arc<dyn StrategyProvider>,
    strategy: StrategyState,
    domain_provider: Option<Arc<dyn TranslationDomainProvider>>,
    metadata: Option<Arc<DynamicTranslationMetadataCache>>,
    application: Arc<dyn ApplicationState>,
    installed: bool,
    events: EventBus,
    sanitizer: Arc<dyn MessageCatalogueSanitizer>,
    resource_cache: Option<ResourceCache>,
    /// Loaders as given, without the caching wrapper; reused by rebuilds.
    raw_loaders: BTreeMap<String, Arc<dyn TranslationLoader>>,
    /// File resources per locale, reused by rebuilds.
    resource_files: BTreeMap<String, Vec<PathBuf>>,
    dynamic: DynamicResources,
}

/// Registers dynamic resources before each compilation and sanitizes the result.
struct DecoratorHooks<'a> {
    dynamic: &'a mut DynamicResources,
    sanitizer: &'a dyn MessageCatalogueSanitizer,
}

impl CompileHooks for DecoratorHooks<'_> {
    fn before_compile(&mut self, base: &mut BaseTranslator) -> Result<(), TranslationError> {
        // Fallback catalogues already in memory are kept instead of recompiled.
        let loaded = base.loaded_for(base.fallback_locales());
        base.initialize()?;
        let registered = self.dynamic.register(base)?;
        if registered > 0 {
            debug!(registered, "Dynamic resources registered");
        }
        base.restore_catalogues(loaded);
        Ok(())
    }

    fn after_compile(&mut self, catalogue: &mut MessageCatalogue) {
        for error in self.sanitizer.sanitize(catalogue) {
            warn!(%error, original = %error.original, "Unsafe translation message found");
        }
    }
}

impl Translator {
    /// Starts a builder over the given strategies.
    #[must_use = "builders do nothing unless you call .build()"]
    pub fn builder(strategy_provider: Arc<dyn StrategyProvider>) -> TranslatorBuilder {
        TranslatorBuilder::new(strategy_provider)
    }

    /// The default locale used when a call names none.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.base.locale()
    }

    /// Changes the default locale.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale.
    pub fn set_locale(&mut self, locale: impl Into<String>) -> Result<(), TranslationError> {
        self.base.set_locale(locale)
    }

    /// Fallback locales of the last applied strategy.
    #[must_use]
    pub fn fallback_locales(&self) -> &[String] {
        self.base.fallback_locales()
    }

    /// Name of the strategy last applied, if any.
    #[must_use]
    pub const fn strategy_state(&self) -> &StrategyState {
        &self.strategy
    }

    /// Bus carrying [`AfterCatalogueDump`] and [`InvalidateTranslationCacheEvent`].
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Options the translator was built with.
    #[must_use]
    pub const fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// File resources tracked per locale.
    #[must_use]
    pub const fn resource_files(&self) -> &BTreeMap<String, Vec<PathBuf>> {
        &self.resource_files
    }

    /// Update times of dynamic translations, when tracked.
    #[must_use]
    pub fn metadata(&self) -> Option<&Arc<DynamicTranslationMetadataCache>> {
        self.metadata.as_ref()
    }

    /// Translates `id`, falling back to the id itself.
    ///
    /// Never fails: on any error a warning is logged and `id` is returned with
    /// the remaining parameters substituted and the `%count%` value appended.
    pub fn trans(
        &mut self,
        id: &str,
        parameters: &Parameters,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> String {
        match self.try_trans(id, parameters, domain, locale) {
            Ok(translated) => translated,
            Err(err) => {
                warn!(error = %err, kind = err.kind(), id, "Translation lookup failed");
                let mut remaining = parameters.clone();
                let count = remaining.remove(COUNT).map(|c| format!(" {c}")).unwrap_or_default();
                format!("{}{count}", replace_parameters(id, &remaining))
            },
        }
    }

    /// Whether `id` is defined by the catalogue of `locale` or any of its fallbacks.
    ///
    /// # Errors
    /// Returns an error when the catalogue cannot be loaded.
    pub fn has_trans(
        &mut self,
        id: &str,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<bool, TranslationError> {
        let locale = self.prepare(locale)?;
        self.catalogue_for(&locale)?;
        self.base.has_trans(id, domain, Some(&locale))
    }

    /// Messages of `locale` merged over its fallback chain, the more specific
    /// locale winning. A non-empty `domains` keeps only those domains.
    ///
    /// # Errors
    /// Returns an error when the catalogue cannot be loaded.
    pub fn get_translations(
        &mut self,
        domains: &[&str],
        locale: Option<&str>,
    ) -> Result<DomainMessages, TranslationError> {
        let catalogue = self.catalogue(locale)?;
        let chain: Vec<&MessageCatalogue> = catalogue.chain().collect();

        let mut translations = DomainMessages::new();
        for link in chain.into_iter().rev() {
            for (domain, messages) in link.all() {
                if !domains.is_empty() && !domains.contains(&domain.as_str()) {
                    continue;
                }
                translations.entry(domain.clone()).or_default().extend(messages.clone());
            }
        }
        Ok(translations)
    }

    /// The catalogue of `locale` with its fallback chain.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] or any loading failure.
    pub fn catalogue(&mut self, locale: Option<&str>) -> Result<Arc<MessageCatalogue>, TranslationError> {
        let locale = self.prepare(locale)?;
        self.catalogue_for(&locale)
    }

    /// File name of the compiled catalogue of `locale` under the current strategy.
    ///
    /// # Errors
    /// Returns an error when the strategy cannot be applied.
    pub fn catalogue_path(&mut self, locale: &str) -> Result<Option<String>, TranslationError> {
        self.ensure_strategy()?;
        match self.base.store() {
            Some(store) => Ok(Some(store.path_for(locale, self.base.vary())?)),
            None => Ok(None),
        }
    }

    /// Registers a resource for `locale`. File resources are also kept for rebuilds.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale.
    pub fn add_resource(
        &mut self,
        format: &str,
        resource: Resource,
        locale: &str,
        domain: Option<&str>,
    ) -> Result<(), TranslationError> {
        if let Resource::File(path) = &resource {
            self.resource_files.entry(locale.to_owned()).or_default().push(path.clone());
        }
        self.base.add_resource(format, resource, locale, domain)
    }

    /// Registers a loader, behind the resource cache when one is configured.
    pub fn add_loader(&mut self, format: &str, loader: Arc<dyn TranslationLoader>) {
        self.raw_loaders.insert(format.to_owned(), Arc::clone(&loader));
        let loader: Arc<dyn TranslationLoader> = match &self.resource_cache {
            Some(cache) => Arc::new(CachingTranslationLoader::new(loader, cache.clone())),
            None => loader,
        };
        self.base.add_loader(format, loader);
    }

    /// Compiles the catalogues of every locale reachable through the fallback
    /// chains of the current strategy. Does nothing without a cache directory.
    ///
    /// Returns the warmed locales.
    ///
    /// # Errors
    /// Propagates loading, store and event failures.
    pub fn warm_up(&mut self) -> Result<Vec<String>, TranslationError> {
        if self.options.cache_dir.is_none() {
            debug!("Translation cache disabled, skipping warm up");
            return Ok(Vec::new());
        }
        self.apply_current_strategy()?;

        let locales = unique(self.base.fallback_locales().iter().cloned());
        for locale in &locales {
            self.load_catalogue(locale)?;
        }
        info!(locales = locales.len(), "Translation cache warmed up");
        Ok(locales)
    }

    /// Deletes the compiled catalogues of every reachable locale.
    ///
    /// Returns the locales whose artifact was removed.
    ///
    /// # Errors
    /// Propagates store and event failures.
    pub fn clear_cache(&mut self) -> Result<Vec<String>, TranslationError> {
        self.apply_current_strategy()?;
        let Some(store) = self.base.store().cloned() else {
            return Ok(Vec::new());
        };

        let locales = unique(self.base.fallback_locales().iter().cloned());
        let mut affected = Vec::new();
        for locale in &locales {
            let path = store.path_for(locale, self.base.vary())?;
            if store.exists(&path)? {
                store.invalidate_compiled(&path);
                store.delete(&path)?;
                affected.push(locale.clone());
            }
        }

        if !affected.is_empty() && self.installed {
            match locales.as_slice() {
                [only] => self.dispatch_invalidate(Some(only))?,
                _ => self.dispatch_invalidate(None)?,
            }
        }
        info!(affected = affected.len(), "Translation cache cleared");
        Ok(affected)
    }

    /// Builds the catalogues of every strategy into a scratch directory, then
    /// moves them into the cache directory.
    ///
    /// Returns the number of artifacts moved.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidConfiguration`] without a cache
    /// directory, or the first build, storage or event failure.
    pub fn rebuild_cache(&mut self) -> Result<usize, TranslationError> {
        let Some(cache_dir) = self.options.cache_dir.clone() else {
            return Err(TranslationError::InvalidConfiguration {
                message: "rebuilding the translation cache requires a cache directory".into(),
                context: None,
            });
        };
        let scratch_dir = scratch_dir(&cache_dir);
        let compression = self.options.storage_compression();

        let mut options = self.options.clone();
        options.cache_dir = Some(scratch_dir.clone());
        options.resource_cache_capacity = 0;
        options.resource_files = self
            .resource_files
            .iter()
            .map(|(locale, files)| (locale.clone(), unique_paths(files)))
            .collect();
        let inline: Vec<(String, RegisteredResource)> = self
            .base
            .all_resources()
            .filter(|(_, entry)| matches!(entry.resource, Resource::Messages(_)))
            .map(|(locale, entry)| (locale.to_owned(), entry.clone()))
            .collect();

        let current = self.strategy_provider.strategy();
        let built = self.build_all_strategies(&options, &inline);
        self.strategy_provider.set_strategy(current);
        if let Err(err) = built {
            if let Ok(scratch) = Storage::builder().root(&scratch_dir).create(false).connect() {
                let _ = scratch.remove_root();
            }
            return Err(err);
        }

        let scratch = Storage::builder().root(&scratch_dir).compression(compression).connect()?;
        let live = Storage::builder().root(&cache_dir).compression(compression).connect()?;
        let names = scratch.files()?;
        let moved = scratch.move_into(&live)?;
        scratch.remove_root()?;
        if let Some(store) = self.base.store() {
            for name in &names {
                store.invalidate_compiled(name);
            }
        }

        self.apply_current_strategy()?;
        if self.installed {
            self.dispatch_invalidate(None)?;
        }
        info!(files = moved, cache_dir = %cache_dir.display(), "Translation cache rebuilt");
        Ok(moved)
    }

    /// Applies the active strategy: fallback locales, cache vary and a fresh
    /// set of catalogues.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] when the strategy yields a malformed locale.
    pub fn apply_current_strategy(&mut self) -> Result<(), TranslationError> {
        let strategy = self.strategy_provider.strategy();
        let fallbacks = self.strategy_provider.all_fallback_locales(strategy.as_ref());

        self.base.set_fallback_locales(fallbacks.clone())?;
        self.base.set_vary(FALLBACK_LOCALES_VARY, serde_json::Value::from(fallbacks));
        debug!(strategy = strategy.name(), "Translation strategy applied");
        self.strategy = StrategyState::Applied(strategy.name().to_owned());
        Ok(())
    }

    fn ensure_strategy(&mut self) -> Result<(), TranslationError> {
        let strategy = self.strategy_provider.strategy();
        if self.strategy.is_applied(strategy.name()) {
            return Ok(());
        }
        self.apply_current_strategy()
    }

    fn try_trans(
        &mut self,
        id: &str,
        parameters: &Parameters,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<String, TranslationError> {
        if id.is_empty() {
            return Ok(String::new());
        }
        let locale = self.prepare(locale)?;
        self.catalogue_for(&locale)?;
        self.base.trans(id, parameters, domain, Some(&locale))
    }

    /// Applies a pending strategy change and resolves the locale.
    fn prepare(&mut self, locale: Option<&str>) -> Result<String, TranslationError> {
        self.ensure_strategy()?;
        let locale = locale.unwrap_or_else(|| self.base.locale()).to_owned();
        validate_locale(&locale)?;
        Ok(locale)
    }

    fn catalogue_for(&mut self, locale: &str) -> Result<Arc<MessageCatalogue>, TranslationError> {
        match self.base.loaded(locale) {
            Some(catalogue) => Ok(catalogue),
            None => self.load_catalogue(locale),
        }
    }

    fn load_catalogue(&mut self, locale: &str) -> Result<Arc<MessageCatalogue>, TranslationError> {
        self.initialize_dynamic_resources(locale)?;

        let store = self.base.store().cloned();
        let path = store.as_ref().map(|store| store.path_for(locale, self.base.vary())).transpose()?;
        let ready = match (&store, &path) {
            (Some(store), Some(path)) => store.exists(path)?,
            _ => false,
        };

        let catalogue = match self.base.loaded(locale) {
            // Compiled in memory as the fallback of another locale, never dumped.
            Some(catalogue) if !ready => {
                if let (Some(store), Some(path)) = (&store, &path) {
                    store.write(path, &catalogue)?;
                }
                catalogue
            },
            _ => {
                let mut hooks =
                    DecoratorHooks { dynamic: &mut self.dynamic, sanitizer: self.sanitizer.as_ref() };
                self.base.load_catalogue(locale, &mut hooks)?
            },
        };

        if !ready && self.installed {
            self.events.publish(AfterCatalogueDump { catalogue: Arc::clone(&catalogue) })?;
        }
        Ok(catalogue)
    }

    /// Discovers dynamic resources of `locale` and drops its artifact when one
    /// of them changed after the artifact was written.
    fn initialize_dynamic_resources(&mut self, locale: &str) -> Result<(), TranslationError> {
        if let (Some(provider), Some(metadata)) = (&self.domain_provider, &self.metadata)
            && self.installed
        {
            self.dynamic.ensure_loaded(
                locale,
                self.base.fallback_locales(),
                provider.as_ref(),
                metadata,
            );
        }

        if self.dynamic.entries(locale).is_empty() {
            return Ok(());
        }
        let Some(store) = self.base.store().cloned() else {
            return Ok(());
        };

        let path = store.path_for(locale, self.base.vary())?;
        let Some(dumped_at) = store.modified(&path)? else {
            return Ok(());
        };
        if self.dynamic.is_fresh(locale, dumped_at) {
            return Ok(());
        }

        store.invalidate_compiled(&path);
        store.delete(&path)?;
        if let Some(cache) = &self.resource_cache {
            cache.clear();
        }
        self.base.clear_catalogues();
        info!(locale, path = %path, "Dynamic translations changed, compiled catalogue removed");

        if self.installed {
            self.dispatch_invalidate(Some(locale))?;
        }
        Ok(())
    }

    fn build_all_strategies(
        &self,
        options: &TranslatorOptions,
        inline: &[(String, RegisteredResource)],
    ) -> Result<(), TranslationError> {
        for strategy in self.strategy_provider.strategies() {
            let name = strategy.name().to_owned();
            self.strategy_provider.set_strategy(strategy);

            let mut child = self.child(options.clone())?;
            for (locale, entry) in inline {
                child.base.add_resource(&entry.format, entry.resource.clone(), locale, Some(&entry.domain))?;
            }
            let locales = child.warm_up()?;
            debug!(strategy = %name, locales = locales.len(), "Strategy cache built");
        }
        Ok(())
    }

    /// A translator sharing every collaborator but built from `options`.
    fn child(&self, options: TranslatorOptions) -> Result<Self, TranslationError> {
        TranslatorBuilder {
            strategy_provider: Arc::clone(&self.strategy_provider),
            locale: self.base.locale().to_owned(),
            options,
            domain_provider: self.domain_provider.clone(),
            metadata: self.metadata.clone(),
            application: Arc::clone(&self.application),
            events: self.events.clone(),
            sanitizer: Arc::clone(&self.sanitizer),
            resource_cache: None,
            loaders: self.raw_loaders.clone(),
        }
        .build()
    }

    fn dispatch_invalidate(&self, locale: Option<&str>) -> Result<(), TranslationError> {
        let event = InvalidateTranslationCacheEvent { locale: locale.map(str::to_owned) };
        let delivered = self.events.publish(event)?;
        debug!(locale, delivered, "Translation cache invalidation dispatched");
        Ok(())
    }
}

impl Translate for Translator {
    fn trans(
        &mut self,
        id: &str,
        parameters: &Parameters,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<String, TranslationError> {
        Ok(Self::trans(self, id, parameters, domain, locale))
    }

    fn has_trans(
        &mut self,
        id: &str,
        domain: Option<&str>,
        locale: Option<&str>,
    ) -> Result<bool, TranslationError> {
        Self::has_trans(self, id, domain, locale)
    }

    fn catalogue(&mut self, locale: Option<&str>) -> Result<Arc<MessageCatalogue>, TranslationError> {
        Self::catalogue(self, locale)
    }

    fn add_resource(
        &mut self,
        format: &str,
        resource: Resource,
        locale: &str,
        domain: Option<&str>,
    ) -> Result<(), TranslationError> {
        Self::add_resource(self, format, resource, locale, domain)
    }

    fn add_loader(&mut self, format: &str, loader: Arc<dyn TranslationLoader>) {
        Self::add_loader(self, format, loader);
    }
}

/// Fluent construction of a [`Translator`].
#[derive(Debug)]
pub struct TranslatorBuilder {
    strategy_provider: Arc<dyn StrategyProvider>,
    locale: String,
    options: TranslatorOptions,
    domain_provider: Option<Arc<dyn TranslationDomainProvider>>,
    metadata: Option<Arc<DynamicTranslationMetadataCache>>,
    application: Arc<dyn ApplicationState>,
    events: EventBus,
    sanitizer: Arc<dyn MessageCatalogueSanitizer>,
    resource_cache: Option<ResourceCache>,
    loaders: BTreeMap<String, Arc<dyn TranslationLoader>>,
}

impl TranslatorBuilder {
    fn new(strategy_provider: Arc<dyn StrategyProvider>) -> Self {
        Self {
            strategy_provider,
            locale: DEFAULT_LOCALE.to_owned(),
            options: TranslatorOptions::default(),
            domain_provider: None,
            metadata: None,
            application: Arc::new(StaticApplicationState::default()),
            events: EventBus::new(),
            sanitizer: Arc::new(HtmlMessageSanitizer),
            resource_cache: None,
            loaders: BTreeMap::new(),
        }
    }

    /// Default locale, `en` unless set.
    #[must_use = "Sets the default locale"]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use = "Sets cache, debug and resource file options"]
    pub fn options(mut self, options: TranslatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Source of the domains stored in the database.
    #[must_use = "Enables discovery of database translations"]
    pub fn domain_provider(mut self, provider: Arc<dyn TranslationDomainProvider>) -> Self {
        self.domain_provider = Some(provider);
        self
    }

    #[must_use = "Enables freshness tracking of database translations"]
    pub fn metadata(mut self, metadata: Arc<DynamicTranslationMetadataCache>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Database translations and events are ignored until the application is installed.
    #[must_use = "Sets the application install state"]
    pub fn application_state(mut self, state: Arc<dyn ApplicationState>) -> Self {
        self.application = state;
        self
    }

    #[must_use = "Sets the bus receiving translation events"]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Defaults to [`HtmlMessageSanitizer`].
    #[must_use = "Replaces the catalogue sanitizer"]
    pub fn sanitizer(mut self, sanitizer: Arc<dyn MessageCatalogueSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Shares a resource cache instead of creating one from the options.
    #[must_use = "Sets the resource cache"]
    pub fn resource_cache(mut self, cache: ResourceCache) -> Self {
        self.resource_cache = Some(cache);
        self
    }

    /// Registers the loader of `format`, replacing any previous one.
    #[must_use = "Registers a loader"]
    pub fn loader(mut self, format: impl Into<String>, loader: Arc<dyn TranslationLoader>) -> Self {
        self.loaders.insert(format.into(), loader);
        self
    }

    /// Opens the cache directory and wraps the loaders in the resource cache.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidLocale`] for a malformed locale and
    /// [`TranslationError::Storage`] when the cache directory cannot be opened.
    pub fn build(self) -> Result<Translator, TranslationError> {
        let options = self.options;
        let mut base = BaseTranslator::new(self.locale)?;
        base.set_fallback_resolver(Arc::new(StrategyFallback(Arc::clone(&self.strategy_provider))));
        base.set_debug(options.debug);
        base.add_resource_files(options.resource_files.clone());
        for (key, value) in &options.cache_vary {
            base.set_vary(key.clone(), serde_json::Value::from(value.as_str()));
        }
        if let Some(dir) = &options.cache_dir {
            let storage =
                Storage::builder().root(dir).compression(options.storage_compression()).connect()?;
            base.set_store(Some(Arc::new(FsArtifactStore::new(storage))));
        }

        let resource_cache = self.resource_cache.or_else(|| {
            (options.resource_cache_capacity > 0)
                .then(|| ResourceCache::new(options.resource_cache_capacity))
        });
        let installed = self.application.is_installed();

        let mut translator = Translator {
            base,
            resource_files: options.resource_files.clone(),
            options,
            strategy_provider: self.strategy_provider,
            strategy: StrategyState::Unapplied,
            domain_provider: self.domain_provider,
            metadata: self.metadata,
            application: self.application,
            installed,
            events: self.events,
            sanitizer: self.sanitizer,
            resource_cache,
            raw_loaders: BTreeMap::new(),
            dynamic: DynamicResources::new(),
        };
        for (format, loader) in self.loaders {
            translator.add_loader(&format, loader);
        }
        Ok(translator)
    }
}

/// Sibling of `cache_dir` with a unique suffix.
fn scratch_dir(cache_dir: &Path) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos());
    let mut name = cache_dir.components().collect::<PathBuf>().into_os_string();
    name.push(format!(".{:x}{nanos:x}", std::process::id()));
    PathBuf::from(name)
}

fn unique_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !out.contains(path) {
            out.push(path.clone());
        }
    }
    out
}
