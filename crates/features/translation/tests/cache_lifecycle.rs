mod common;

use common::{
    ChildFirst, artifacts, builder, cached_options, fixture_files, provider, single_locale_provider,
};
use rosetta_event_bus::EventReceiverExt;
use rosetta_translation::{
    AfterCatalogueDump, InvalidateTranslationCacheEvent, Parameters, StrategyProvider,
    TranslatorOptions,
};
use std::fs::File;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[test]
fn warm_up_writes_one_artifact_per_locale() {
    let dir = TempDir::new().unwrap();
    let options = cached_options(dir.path());
    let mut translator = builder(provider(), options.clone()).build().unwrap();
    let mut dumps = translator.events().subscribe::<AfterCatalogueDump>().unwrap();

    let warmed = translator.warm_up().unwrap();

    assert_eq!(warmed, ["en", "fr"]);
    assert_eq!(artifacts(&dir.path().join("cache")).len(), 2);
    let dumped: Vec<String> = dumps.drain().iter().map(|e| e.catalogue.locale().to_owned()).collect();
    assert_eq!(dumped, ["en", "fr"]);

    // A second process reads the artifacts instead of compiling.
    let mut reader = builder(provider(), options).build().unwrap();
    let mut reader_dumps = reader.events().subscribe::<AfterCatalogueDump>().unwrap();
    reader.warm_up().unwrap();
    assert!(reader_dumps.drain().is_empty());
    assert_eq!(reader.trans("greeting", &Parameters::new(), None, Some("fr")), "Bonjour");
    assert_eq!(reader.trans("farewell", &Parameters::new(), None, Some("fr")), "Goodbye");
}

#[test]
fn warm_up_dumps_parents_compiled_as_fallbacks() {
    let dir = TempDir::new().unwrap();
    let mut translator =
        builder(Arc::new(ChildFirst(provider())), cached_options(dir.path())).build().unwrap();
    let mut dumps = translator.events().subscribe::<AfterCatalogueDump>().unwrap();
    let cache = dir.path().join("cache");

    assert_eq!(translator.warm_up().unwrap(), ["fr", "en"]);

    assert_eq!(artifacts(&cache).len(), 2);
    let dumped: Vec<String> = dumps.drain().iter().map(|e| e.catalogue.locale().to_owned()).collect();
    assert_eq!(dumped, ["fr", "en"]);
    assert_eq!(translator.clear_cache().unwrap(), ["fr", "en"]);
    assert!(artifacts(&cache).is_empty());
}

#[test]
fn rebuild_with_child_first_fallbacks_builds_every_artifact() {
    let dir = TempDir::new().unwrap();
    let mut translator =
        builder(Arc::new(ChildFirst(provider())), cached_options(dir.path())).build().unwrap();

    assert_eq!(translator.rebuild_cache().unwrap(), 4);
    assert_eq!(artifacts(&dir.path().join("cache")).len(), 4);
}

#[test]
fn warm_up_without_cache_dir_does_nothing() {
    let dir = TempDir::new().unwrap();
    let options =
        TranslatorOptions { resource_files: fixture_files(dir.path()), ..TranslatorOptions::default() };
    let mut translator = builder(provider(), options).build().unwrap();

    assert!(translator.warm_up().unwrap().is_empty());
    assert_eq!(translator.catalogue_path("en").unwrap(), None);
    assert!(translator.clear_cache().unwrap().is_empty());
}

#[test]
fn clear_cache_over_several_locales_invalidates_everything() {
    let dir = TempDir::new().unwrap();
    let mut translator = builder(provider(), cached_options(dir.path())).build().unwrap();
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();
    translator.warm_up().unwrap();

    let cleared = translator.clear_cache().unwrap();

    assert_eq!(cleared, ["en", "fr"]);
    assert!(artifacts(&dir.path().join("cache")).is_empty());
    let events = invalidations.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(*events[0], InvalidateTranslationCacheEvent::all());

    assert!(translator.clear_cache().unwrap().is_empty());
    assert!(invalidations.drain().is_empty());
}

#[test]
fn clear_cache_of_a_single_locale_is_scoped() {
    let dir = TempDir::new().unwrap();
    let mut translator = builder(single_locale_provider(), cached_options(dir.path())).build().unwrap();
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();
    translator.warm_up().unwrap();

    assert_eq!(translator.clear_cache().unwrap(), ["en"]);
    let events = invalidations.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(*events[0], InvalidateTranslationCacheEvent::for_locale("en"));
}

#[test]
fn rebuild_builds_every_strategy_and_swaps_it_in() {
    let dir = TempDir::new().unwrap();
    let strategies = provider();
    let mut translator = builder(strategies.clone(), cached_options(dir.path())).build().unwrap();
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();
    let cache = dir.path().join("cache");

    let moved = translator.rebuild_cache().unwrap();

    assert_eq!(moved, 4);
    assert_eq!(artifacts(&cache).len(), 4);
    assert_eq!(strategies.strategy().name(), "default");
    let siblings = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(siblings, 2, "scratch directory must be removed");
    let events = invalidations.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(*events[0], InvalidateTranslationCacheEvent::all());

    // Only the artifacts of the active strategy are cleared.
    assert_eq!(translator.clear_cache().unwrap().len(), 2);
    assert_eq!(artifacts(&cache).len(), 2);
    assert_eq!(invalidations.drain().len(), 1);
}

#[test]
fn rebuilt_artifacts_serve_the_live_translator() {
    let dir = TempDir::new().unwrap();
    let strategies = provider();
    let mut translator = builder(strategies.clone(), cached_options(dir.path())).build().unwrap();
    translator.rebuild_cache().unwrap();

    let mut dumps = translator.events().subscribe::<AfterCatalogueDump>().unwrap();
    assert_eq!(translator.trans("greeting", &Parameters::new(), None, Some("fr")), "Bonjour");
    strategies.set_strategy_by_name("french").unwrap();
    assert_eq!(translator.trans("farewell", &Parameters::new(), None, Some("fr")), "farewell");
    assert!(dumps.drain().is_empty());
}

#[test]
fn failed_rebuild_restores_the_strategy_and_removes_the_scratch_dir() {
    let dir = TempDir::new().unwrap();
    let mut options = cached_options(dir.path());
    let yaml = dir.path().join("translations").join("extra.en.yaml");
    std::fs::write(&yaml, "greeting: Howdy").unwrap();
    options.resource_files.entry("en".to_owned()).or_default().push(yaml);
    let strategies = provider();
    strategies.set_strategy_by_name("french").unwrap();
    let mut translator = builder(strategies.clone(), options).build().unwrap();
    let mut invalidations = translator.events().subscribe::<InvalidateTranslationCacheEvent>().unwrap();

    let err = translator.rebuild_cache().unwrap_err();

    assert_eq!(err.kind(), "MissingLoader");
    assert_eq!(strategies.strategy().name(), "french");
    let scratch: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.unwrap().file_name().into_string().ok())
        .filter(|name| name.starts_with("cache."))
        .collect();
    assert!(scratch.is_empty(), "scratch directories left behind: {scratch:?}");
    assert!(artifacts(&dir.path().join("cache")).is_empty());
    assert!(invalidations.drain().is_empty());
}

#[test]
fn rebuild_requires_a_cache_dir() {
    let dir = TempDir::new().unwrap();
    let options =
        TranslatorOptions { resource_files: fixture_files(dir.path()), ..TranslatorOptions::default() };
    let mut translator = builder(provider(), options).build().unwrap();

    let err = translator.rebuild_cache().unwrap_err();
    assert_eq!(err.kind(), "InvalidConfiguration");
}

#[test]
fn debug_mode_recompiles_when_a_resource_changes() {
    let dir = TempDir::new().unwrap();
    let mut options = cached_options(dir.path());
    options.debug = true;
    builder(provider(), options.clone()).build().unwrap().warm_up().unwrap();

    let en = dir.path().join("translations").join("messages.en.json");
    std::fs::write(&en, r#"{"greeting": "Hello again"}"#).unwrap();
    File::options()
        .write(true)
        .open(&en)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(3600))
        .unwrap();

    let mut production = options.clone();
    production.debug = false;
    let mut stale = builder(provider(), production).build().unwrap();
    assert_eq!(stale.trans("greeting", &Parameters::new(), None, Some("en")), "Hello");

    let mut fresh = builder(provider(), options).build().unwrap();
    assert_eq!(fresh.trans("greeting", &Parameters::new(), None, Some("en")), "Hello again");
}

#[test]
fn artifact_loads_match_the_compiled_catalogue() {
    let dir = TempDir::new().unwrap();
    let options = cached_options(dir.path());
    let mut writer = builder(provider(), options.clone()).build().unwrap();
    let compiled = writer.catalogue(Some("fr")).unwrap();

    let mut reader = builder(provider(), options).build().unwrap();
    let first = reader.catalogue(Some("fr")).unwrap();
    let second = reader.catalogue(Some("fr")).unwrap();

    assert_eq!(*first, *compiled);
    assert_eq!(*second, *first);
}
