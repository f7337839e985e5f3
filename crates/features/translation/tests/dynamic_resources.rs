mod common;

use common::{artifacts, builder, cached_options, single_locale_provider};
use rosetta_domain::constants::{DATABASE_FORMAT, DEFAULT_DOMAIN};
use rosetta_event_bus::EventReceiverExt;
use rosetta_translation::{
    AfterCatalogueDump, DatabaseTranslationLoader, DynamicTranslationMetadataCache,
    InMemoryTranslationRepository, InvalidateTranslationCacheEvent, Parameters, ResourceCache,
    StaticApplicationState, Translator, TranslatorOptions,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const HOUR: Duration = Duration::from_secs(3600);

struct Fixture {
    dir: TempDir,
    options: TranslatorOptions,
    metadata: Arc<DynamicTranslationMetadataCache>,
    repository: Arc<InMemoryTranslationRepository>,
    resources: ResourceCache,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let options = cached_options(dir.path());
        let metadata = Arc::new(DynamicTranslationMetadataCache::new());
        let repository = Arc::new(InMemoryTranslationRepository::with_metadata(Arc::clone(&metadata)));
        Self { dir, options, metadata, repository, resources: ResourceCache::new(64) }
    }

    /// Stores a message and pins its update time relative to now.
    fn set(&self, id: &str, text: &str, updated: SystemTime) {
        self.repository.set_message("en", DEFAULT_DOMAIN, id, text);
        self.metadata.set_timestamp("en", updated);
    }

    fn translator(&self, installed: bool) -> Translator {
        builder(single_locale_provider(), self.options.clone())
            .domain_provider(self.repository.clone())
            .metadata(Arc::clone(&self.metadata))
            .resource_cache(self.resources.clone())
            .application_state(Arc::new(StaticApplicationState(installed)))
            .loader(DATABASE_FORMAT, Arc::new(DatabaseTranslationLoader::new(self.repository.clone())))
            .build()
            .unwrap()
    }
}

#[test]
fn database_messages_override_file_messages() {
    let fixture = Fixture::new();
    fixture.set("greeting", "Hello from the database", SystemTime::now() - HOUR);
    let mut translator = fixture.translator(true);

    assert_eq!(translator.trans("greeting", &Parameters::new(), None, None), "Hello from the database");
    assert_eq!(translator.trans("farewell", &Parameters::new(), None, None), "Goodbye");
}

#[test]
fn database_only_domains_are_discovered() {
    let fixture = Fixture::new();
    fixture.repository.set_message("en", "validators", "required", "This value is required");
    fixture.metadata.set_timestamp("en", SystemTime::now() - HOUR);
    let mut translator = fixture.translator(true);

    assert_eq!(
        translator.trans("required", &Parameters::new(), Some("validators"), None),
        "This value is required"
    );
}

#[test]
fn newer_database_update_drops_the_artifact() {
    let fixture = Fixture::new();
    fixture.set("greeting", "Hello from the database", SystemTime::now() - HOUR);
    fixture.translator(true).warm_up().unwrap();
    assert_eq!(artifacts(&fixture.dir.path().join("cache")).len(), 1);

    fixture.set("greeting", "Updated greeting", SystemTime::now() + HOUR);
    let mut translator = fixture.translator(true);
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();
    let mut dumps = translator.events().subscribe::<AfterCatalogueDump>().unwrap();

    assert_eq!(translator.trans("greeting", &Parameters::new(), None, None), "Updated greeting");

    let events = invalidations.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(*events[0], InvalidateTranslationCacheEvent::for_locale("en"));
    assert_eq!(dumps.drain().len(), 1);
    assert_eq!(artifacts(&fixture.dir.path().join("cache")).len(), 1);
}

#[test]
fn newer_database_update_rereads_file_resources() {
    let fixture = Fixture::new();
    fixture.set("greeting", "Hello from the database", SystemTime::now() - HOUR);
    fixture.translator(true).warm_up().unwrap();
    assert_eq!(fixture.resources.entry_count(), 1);

    // Outside debug mode file mtimes are not checked, so only a cleared resource
    // cache sees the new text.
    let en = fixture.dir.path().join("translations").join("messages.en.json");
    std::fs::write(&en, r#"{"farewell": "See you"}"#).unwrap();
    fixture.set("greeting", "Updated greeting", SystemTime::now() + HOUR);
    let mut translator = fixture.translator(true);

    assert_eq!(translator.trans("farewell", &Parameters::new(), None, None), "See you");
    assert_eq!(fixture.resources.entry_count(), 1);
}

#[test]
fn older_database_update_keeps_the_artifact() {
    let fixture = Fixture::new();
    fixture.set("greeting", "Hello from the database", SystemTime::now() - HOUR);
    fixture.translator(true).warm_up().unwrap();

    // Written behind the metadata cache, so only the compiled artifact knows the old text.
    fixture.repository.set_message("en", DEFAULT_DOMAIN, "greeting", "Never seen");
    fixture.metadata.set_timestamp("en", SystemTime::now() - 2 * HOUR);

    let mut translator = fixture.translator(true);
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();

    assert_eq!(translator.trans("greeting", &Parameters::new(), None, None), "Hello from the database");
    assert!(invalidations.drain().is_empty());
}

#[test]
fn nothing_is_discovered_or_published_before_installation() {
    let fixture = Fixture::new();
    fixture.set("greeting", "Hello from the database", SystemTime::now() - HOUR);
    let mut translator = fixture.translator(false);
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();
    let mut dumps = translator.events().subscribe::<AfterCatalogueDump>().unwrap();

    assert_eq!(translator.warm_up().unwrap(), ["en"]);
    assert_eq!(translator.trans("greeting", &Parameters::new(), None, None), "Hello");
    assert_eq!(translator.clear_cache().unwrap(), ["en"]);

    assert!(invalidations.drain().is_empty());
    assert!(dumps.drain().is_empty());
}
