#![allow(dead_code, unreachable_pub)]

use rosetta_translation::{
    DefaultTranslationStrategy, JSON_FORMAT, JsonFileLoader, LocaleTree, StaticTranslationStrategy,
    StrategyProvider, TranslationStrategy, TranslationStrategyProvider, TranslatorBuilder,
    TranslatorOptions, Translator,
};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// `default` over `en` and `fr`, then `french` where `en` falls back to `fr`.
pub fn provider() -> Arc<TranslationStrategyProvider> {
    let mut french = LocaleTree::new();
    french.insert(&[], "fr");
    french.insert(&["fr"], "en");
    let strategies: Vec<Arc<dyn TranslationStrategy>> = vec![
        Arc::new(DefaultTranslationStrategy::new(["en", "fr"])),
        Arc::new(StaticTranslationStrategy::new("french", french)),
    ];
    Arc::new(TranslationStrategyProvider::new(strategies).unwrap())
}

/// Lists every fallback locale child first, so parents are compiled in memory
/// before their own turn comes.
#[derive(Debug)]
pub struct ChildFirst(pub Arc<TranslationStrategyProvider>);

impl StrategyProvider for ChildFirst {
    fn strategy(&self) -> Arc<dyn TranslationStrategy> {
        self.0.strategy()
    }

    fn strategies(&self) -> Vec<Arc<dyn TranslationStrategy>> {
        self.0.strategies()
    }

    fn set_strategy(&self, strategy: Arc<dyn TranslationStrategy>) {
        self.0.set_strategy(strategy);
    }

    fn all_fallback_locales(&self, strategy: &dyn TranslationStrategy) -> Vec<String> {
        let mut locales = self.0.all_fallback_locales(strategy);
        locales.reverse();
        locales
    }
}

pub fn single_locale_provider() -> Arc<TranslationStrategyProvider> {
    Arc::new(
        TranslationStrategyProvider::new(vec![Arc::new(DefaultTranslationStrategy::new(["en"]))])
            .unwrap(),
    )
}

pub fn write_json(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// `messages.en.json` and `messages.fr.json` below `dir/translations`.
pub fn fixture_files(dir: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let translations = dir.join("translations");
    std::fs::create_dir_all(&translations).unwrap();
    let en = write_json(
        &translations,
        "messages.en.json",
        r#"{"greeting": "Hello", "farewell": "Goodbye", "apples": "one: one apple|other: %count% apples"}"#,
    );
    let fr = write_json(&translations, "messages.fr.json", r#"{"greeting": "Bonjour"}"#);
    BTreeMap::from([("en".to_owned(), vec![en]), ("fr".to_owned(), vec![fr])])
}

pub fn cached_options(dir: &Path) -> TranslatorOptions {
    TranslatorOptions {
        cache_dir: Some(dir.join("cache")),
        resource_files: fixture_files(dir),
        resource_cache_capacity: 64,
        ..TranslatorOptions::default()
    }
}

pub fn builder(provider: Arc<dyn StrategyProvider>, options: TranslatorOptions) -> TranslatorBuilder {
    Translator::builder(provider).options(options).loader(JSON_FORMAT, Arc::new(JsonFileLoader))
}

/// Names of the compiled catalogues in `dir`.
pub fn artifacts(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|e| e.file_name().into_string().ok())
                .filter(|name| name.starts_with("catalogue."))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Collects formatted log lines written while a closure runs.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, LogCapture) {
    let logs = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
