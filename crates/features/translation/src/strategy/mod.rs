//! Translation strategies decide which locales fall back to which.
//!
//! A strategy exposes its fallbacks as a [`LocaleTree`]: every key is a locale
//! and its children fall back to it. The [`StrategyProvider`] keeps the active
//! strategy and derives the flat lists the translator needs from the tree.

mod default;
mod provider;
mod static_tree;

pub use default::DefaultTranslationStrategy;
pub use provider::TranslationStrategyProvider;
pub use static_tree::StaticTranslationStrategy;

use crate::error::TranslationError;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Locale to the locales falling back to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleTree(pub BTreeMap<String, LocaleTree>);

impl LocaleTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `locale` under the node at `path`, creating missing nodes.
    pub fn insert(&mut self, path: &[&str], locale: &str) {
        let mut node = self;
        for segment in path {
            node = node.0.entry((*segment).to_owned()).or_default();
        }
        node.0.entry(locale.to_owned()).or_default();
    }

    /// Every locale of the tree, parents before children, each once.
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    /// Ancestors of `locale`, nearest first. Empty when the locale is not in the tree.
    #[must_use]
    pub fn ancestors(&self, locale: &str) -> Vec<String> {
        let mut path = Vec::new();
        if self.find(locale, &mut path) {
            path.reverse();
            path
        } else {
            Vec::new()
        }
    }

    fn collect(&self, out: &mut Vec<String>) {
        for (locale, children) in &self.0 {
            if !out.contains(locale) {
                out.push(locale.clone());
            }
            children.collect(out);
        }
    }

    fn find(&self, locale: &str, path: &mut Vec<String>) -> bool {
        for (node, children) in &self.0 {
            if node == locale {
                return true;
            }
            path.push(node.clone());
            if children.find(locale, path) {
                return true;
            }
            path.pop();
        }
        false
    }
}

/// A named fallback policy.
pub trait TranslationStrategy: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn locale_fallbacks(&self) -> LocaleTree;
}

/// Holds the registered strategies and the active one.
pub trait StrategyProvider: Send + Sync + Debug {
    fn strategy(&self) -> Arc<dyn TranslationStrategy>;

    fn strategies(&self) -> Vec<Arc<dyn TranslationStrategy>>;

    fn set_strategy(&self, strategy: Arc<dyn TranslationStrategy>);

    /// Activates a registered strategy by name.
    ///
    /// # Errors
    /// Returns [`TranslationError::UnknownStrategy`] when no strategy has that name.
    fn set_strategy_by_name(&self, name: &str) -> Result<(), TranslationError> {
        let strategy = self
            .strategies()
            .into_iter()
            .find(|strategy| strategy.name() == name)
            .ok_or_else(|| TranslationError::UnknownStrategy {
                message: name.to_owned().into(),
                context: None,
            })?;
        self.set_strategy(strategy);
        Ok(())
    }

    /// Every locale reachable in the strategy's fallback tree.
    fn all_fallback_locales(&self, strategy: &dyn TranslationStrategy) -> Vec<String> {
        strategy.locale_fallbacks().locales()
    }

    /// The fallback chain of `locale`, nearest first.
    fn fallback_locales(&self, strategy: &dyn TranslationStrategy, locale: &str) -> Vec<String> {
        strategy.locale_fallbacks().ancestors(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> LocaleTree {
        let mut tree = LocaleTree::new();
        tree.insert(&[], "en");
        tree.insert(&["en"], "fr");
        tree.insert(&["en", "fr"], "fr_CA");
        tree.insert(&["en"], "de");
        tree
    }

    #[test]
    fn locales_are_listed_parents_first() {
        assert_eq!(tree().locales(), ["en", "de", "fr", "fr_CA"]);
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let tree = tree();
        assert_eq!(tree.ancestors("fr_CA"), ["fr", "en"]);
        assert_eq!(tree.ancestors("de"), ["en"]);
        assert!(tree.ancestors("en").is_empty());
        assert!(tree.ancestors("pt").is_empty());
    }
}
