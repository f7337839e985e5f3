//! # Translation
//!
//! Message catalogues with strategy-driven locale fallbacks, database-backed
//! dynamic resources and a compiled catalogue cache.
//!
//! The [`Translator`] decorates a [`BaseTranslator`]:
//!
//! * the active [`TranslationStrategy`] decides the fallback chain of every
//!   locale and is folded into the cache fingerprint, so switching strategies
//!   never reads another strategy's artifacts;
//! * dynamic resources (see [`DynamicResources`]) are discovered per locale and
//!   an artifact older than any of them is dropped before loading;
//! * [`Translator::warm_up`], [`Translator::clear_cache`] and
//!   [`Translator::rebuild_cache`] maintain the artifacts and publish
//!   [`InvalidateTranslationCacheEvent`]s on the [`rosetta_event_bus::EventBus`].
//!
//! ```rust
//! use rosetta_translation::{
//!     ArrayLoader, DefaultTranslationStrategy, Parameters, Resource, TranslationError,
//!     TranslationStrategyProvider, Translator, ARRAY_FORMAT,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), TranslationError> {
//!     let strategies = TranslationStrategyProvider::new(vec![Arc::new(
//!         DefaultTranslationStrategy::new(["en", "fr"]),
//!     )])?;
//!     let mut translator = Translator::builder(Arc::new(strategies))
//!         .locale("fr")
//!         .loader(ARRAY_FORMAT, Arc::new(ArrayLoader))
//!         .build()?;
//!
//!     translator.add_resource(ARRAY_FORMAT, Resource::messages([("greeting", "Hello")]), "en", None)?;
//!
//!     assert_eq!(translator.trans("greeting", &Parameters::new(), None, None), "Hello");
//!     assert_eq!(translator.trans("missing", &Parameters::new(), None, None), "missing");
//!     Ok(())
//! }
//! ```

mod artifact;
mod base;
mod catalogue;
mod domain_provider;
mod dynamic;
mod error;
mod events;
mod fallback;
mod formatter;
mod loader;
mod metadata;
mod metrics;
mod options;
mod repository;
mod resource;
mod sanitizer;
mod state;
mod strategy;
mod translate;
mod translator;

pub use artifact::{CacheVary, CompiledArtifactStore, FsArtifactStore, artifact_name, fingerprint};
pub use base::{BaseTranslator, CompileHooks, NoHooks, RegisteredResource, validate_locale};
pub use catalogue::{Chain, DomainMessages, MessageCatalogue, Messages};
pub use domain_provider::{DomainEntry, TranslationDomainProvider};
pub use dynamic::{DynamicResourceEntry, DynamicResources};
pub use error::{TranslationError, TranslationErrorExt};
pub use events::{AfterCatalogueDump, InvalidateTranslationCacheEvent};
pub use fallback::{FallbackResolver, ParentLocaleFallback, StrategyFallback};
pub use formatter::{COUNT, MessageFormatter, Parameters, replace_parameters};
pub use loader::{
    ARRAY_FORMAT, ArrayLoader, CachingTranslationLoader, DatabaseTranslationLoader, JSON_FORMAT,
    JsonFileLoader, ResourceCache, TranslationLoader,
};
pub use metadata::DynamicTranslationMetadataCache;
pub use metrics::{
    CACHE_KEY as METRICS_CACHE_KEY, CachingTranslationMetricsProvider, JsonFileMetricsAdapter,
    RawTranslationMetrics, TranslationMetrics, TranslationServiceAdapter,
};
pub use options::{ResourceFileName, TranslatorOptions, scan_resource_dir};
pub use repository::{InMemoryTranslationRepository, TranslationRepository};
pub use resource::{DatabaseTranslationResource, Resource};
pub use sanitizer::{HtmlMessageSanitizer, MessageCatalogueSanitizer, SanitizationError};
pub use state::{ApplicationState, StaticApplicationState, StrategyState};
pub use strategy::{
    DefaultTranslationStrategy, LocaleTree, StaticTranslationStrategy, StrategyProvider,
    TranslationStrategy, TranslationStrategyProvider,
};
pub use translate::Translate;
pub use translator::{Translator, TranslatorBuilder};
