use super::{LocaleTree, TranslationStrategy};
use rosetta_domain::constants::DEFAULT_LOCALE;

/// Every locale falls back to its language, and every language to `en`.
#[derive(Debug, Clone)]
pub struct DefaultTranslationStrategy {
    locales: Vec<String>,
}

impl DefaultTranslationStrategy {
    pub const NAME: &'static str = "default";

    #[must_use]
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { locales: locales.into_iter().map(Into::into).collect() }
    }
}

impl TranslationStrategy for DefaultTranslationStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn locale_fallbacks(&self) -> LocaleTree {
        let mut tree = LocaleTree::new();
        tree.insert(&[], DEFAULT_LOCALE);
        for locale in &self.locales {
            if locale == DEFAULT_LOCALE {
                continue;
            }
            match locale.split_once('_') {
                Some((language, _)) if language == DEFAULT_LOCALE => {
                    tree.insert(&[DEFAULT_LOCALE], locale);
                },
                Some((language, _)) => {
                    tree.insert(&[DEFAULT_LOCALE], language);
                    tree.insert(&[DEFAULT_LOCALE, language], locale);
                },
                None => tree.insert(&[DEFAULT_LOCALE], locale),
            }
        }
        tree
    }
}
