//! Translation completeness metrics reported by the remote translation service.

use crate::error::{TranslationError, TranslationErrorExt};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

pub const CACHE_KEY: &str = "translation_statistic";
const CACHE_TTL: Duration = Duration::from_secs(86_400);

/// Metrics of one language as delivered by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTranslationMetrics {
    pub code: String,
    #[serde(default)]
    pub translation_status: Option<u32>,
    #[serde(default)]
    pub last_build_date: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Metrics of one language with a parsed build date.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationMetrics {
    pub code: String,
    pub translation_status: Option<u32>,
    /// `None` when the service sent no date or an unparsable one.
    pub last_build_date: Option<DateTime<Utc>>,
    pub extra: BTreeMap<String, Value>,
}

impl From<RawTranslationMetrics> for TranslationMetrics {
    fn from(raw: RawTranslationMetrics) -> Self {
        let last_build_date = match &raw.last_build_date {
            Some(Value::String(date)) => parse_build_date(date),
            _ => None,
        };
        Self {
            code: raw.code,
            translation_status: raw.translation_status,
            last_build_date,
            extra: raw.extra,
        }
    }
}

/// Client of the translation service.
pub trait TranslationServiceAdapter: Send + Sync + Debug {
    /// # Errors
    /// Any failure of the service; callers treat it as "no metrics".
    fn fetch_translation_metrics(&self) -> Result<Vec<RawTranslationMetrics>, TranslationError>;
}

/// Reads metrics from a JSON array on disk, as exported from the service.
#[derive(Debug, Clone)]
pub struct JsonFileMetricsAdapter {
    path: PathBuf,
}

impl JsonFileMetricsAdapter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TranslationServiceAdapter for JsonFileMetricsAdapter {
    fn fetch_translation_metrics(&self) -> Result<Vec<RawTranslationMetrics>, TranslationError> {
        let context = format!("Failed to read metrics from {}", self.path.display());
        let bytes = std::fs::read(&self.path).context(context.clone())?;
        serde_json::from_slice(&bytes).context(context)
    }
}

/// Serves metrics from a one-day cache, fetching them at most once per expiry.
#[derive(Debug)]
pub struct CachingTranslationMetricsProvider {
    adapter: Arc<dyn TranslationServiceAdapter>,
    cache: Cache<String, Arc<BTreeMap<String, RawTranslationMetrics>>>,
}

impl CachingTranslationMetricsProvider {
    #[must_use]
    pub fn new(adapter: Arc<dyn TranslationServiceAdapter>) -> Self {
        let cache = Cache::builder().name("translation-metrics").time_to_live(CACHE_TTL).build();
        Self::with_cache(adapter, cache)
    }

    /// Uses a cache shared with other providers.
    #[must_use]
    pub fn with_cache(
        adapter: Arc<dyn TranslationServiceAdapter>,
        cache: Cache<String, Arc<BTreeMap<String, RawTranslationMetrics>>>,
    ) -> Self {
        Self { adapter, cache }
    }

    /// Metrics of every language, keyed by language code.
    #[must_use]
    pub fn get_all(&self) -> BTreeMap<String, TranslationMetrics> {
        self.populate()
            .iter()
            .map(|(code, raw)| (code.clone(), TranslationMetrics::from(raw.clone())))
            .collect()
    }

    #[must_use]
    pub fn get_for_language(&self, code: &str) -> Option<TranslationMetrics> {
        self.populate().get(code).cloned().map(TranslationMetrics::from)
    }

    fn populate(&self) -> Arc<BTreeMap<String, RawTranslationMetrics>> {
        self.cache.get_with(CACHE_KEY.to_owned(), || {
            let by_code: BTreeMap<_, _> =
                self.fetch().into_iter().map(|metrics| (metrics.code.clone(), metrics)).collect();
            Arc::new(by_code)
        })
    }

    fn fetch(&self) -> Vec<RawTranslationMetrics> {
        match self.adapter.fetch_translation_metrics() {
            Ok(metrics) => {
                debug!(languages = metrics.len(), "Translation metrics fetched");
                metrics
            },
            Err(err) => {
                error!(error = %err, kind = err.kind(), "Failed to fetch translation metrics.");
                Vec::new()
            },
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`, all read as UTC.
fn parse_build_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Flaky {
        calls: AtomicUsize,
        fail: bool,
    }

    impl TranslationServiceAdapter for Flaky {
        fn fetch_translation_metrics(&self) -> Result<Vec<RawTranslationMetrics>, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TranslationError::Service { message: "timeout".into(), context: None });
            }
            Ok(serde_json::from_value(serde_json::json!([
                { "code": "uk_UA", "translationStatus": 87, "lastBuildDate": "2024-03-01T10:00:00+02:00" },
                { "code": "de_DE", "translationStatus": 100, "lastBuildDate": "2024-02-01 12:30:00", "sources": 3 },
                { "code": "fr_FR", "lastBuildDate": "yesterday" },
                { "code": "es_ES", "lastBuildDate": 20_240_101 }
            ]))
            .unwrap())
        }
    }

    #[test]
    fn metrics_are_fetched_once_and_dates_parsed() {
        let adapter = Arc::new(Flaky::default());
        let provider = CachingTranslationMetricsProvider::new(adapter.clone());

        let all = provider.get_all();
        assert_eq!(all.len(), 4);
        assert_eq!(
            all["uk_UA"].last_build_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            all["de_DE"].last_build_date,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(all["de_DE"].extra["sources"], 3);
        assert_eq!(all["fr_FR"].last_build_date, None);
        assert_eq!(all["es_ES"].last_build_date, None);

        assert_eq!(provider.get_for_language("uk_UA").unwrap().translation_status, Some(87));
        assert!(provider.get_for_language("pt_BR").is_none());
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_cache_spares_the_adapter() {
        let adapter = Arc::new(Flaky::default());
        let cache = Cache::builder().time_to_live(CACHE_TTL).build();
        let first = CachingTranslationMetricsProvider::with_cache(adapter.clone(), cache.clone());
        let second = CachingTranslationMetricsProvider::with_cache(adapter.clone(), cache);

        assert_eq!(first.get_all().len(), second.get_all().len());
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expired_metrics_are_fetched_again() {
        let adapter = Arc::new(Flaky::default());
        let cache = Cache::builder().time_to_live(Duration::from_millis(50)).build();
        let provider = CachingTranslationMetricsProvider::with_cache(adapter.clone(), cache);

        assert_eq!(provider.get_all().len(), 4);
        assert_eq!(provider.get_all().len(), 4);
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);

        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(provider.get_all().len(), 4);
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failures_yield_no_metrics() {
        let adapter = Arc::new(Flaky { fail: true, ..Flaky::default() });
        let provider = CachingTranslationMetricsProvider::new(adapter.clone());

        assert!(provider.get_all().is_empty());
        assert!(provider.get_for_language("uk_UA").is_none());
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn build_dates_accept_plain_dates() {
        assert_eq!(
            parse_build_date("2023-12-31"),
            Some(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_build_date("31/12/2023"), None);
    }
}
