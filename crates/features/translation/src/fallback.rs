use crate::strategy::StrategyProvider;
use std::fmt::Debug;
use std::sync::Arc;

/// Computes the fallback chain of a locale, nearest first.
pub trait FallbackResolver: Send + Sync + Debug {
    fn fallback_locales(&self, locale: &str, configured: &[String]) -> Vec<String>;
}

/// `fr_FR` falls back to `fr`, then to the configured fallback locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentLocaleFallback;

impl FallbackResolver for ParentLocaleFallback {
    fn fallback_locales(&self, locale: &str, configured: &[String]) -> Vec<String> {
        let mut locales = Vec::with_capacity(configured.len() + 1);
        if let Some((parent, _)) = locale.rsplit_once('_').or_else(|| locale.rsplit_once('-')) {
            locales.push(parent.to_owned());
        }
        locales.extend(configured.iter().cloned());
        unique_except(locales, locale)
    }
}

/// Chains given by the active strategy of a [`StrategyProvider`].
#[derive(Debug, Clone)]
pub struct StrategyFallback(pub Arc<dyn StrategyProvider>);

impl FallbackResolver for StrategyFallback {
    fn fallback_locales(&self, locale: &str, _configured: &[String]) -> Vec<String> {
        let strategy = self.0.strategy();
        unique_except(self.0.fallback_locales(strategy.as_ref(), locale), locale)
    }
}

/// Removes duplicates and `locale` itself, keeping the first occurrence.
pub(crate) fn unique_except(locales: Vec<String>, locale: &str) -> Vec<String> {
    unique(locales.into_iter().filter(|candidate| *candidate != locale))
}

pub(crate) fn unique(locales: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for candidate in locales {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}
