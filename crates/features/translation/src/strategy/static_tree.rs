use super::{LocaleTree, TranslationStrategy};
use crate::error::TranslationError;
use std::collections::BTreeMap;

/// A strategy with a fixed tree, typically read from configuration.
#[derive(Debug, Clone)]
pub struct StaticTranslationStrategy {
    name: String,
    tree: LocaleTree,
}

impl StaticTranslationStrategy {
    #[must_use]
    pub fn new(name: impl Into<String>, tree: LocaleTree) -> Self {
        Self { name: name.into(), tree }
    }

    /// Builds the tree from `locale -> parent` pairs; an empty parent marks a root.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidConfiguration`] when a parent is not
    /// declared or the pairs form a cycle.
    pub fn from_parents(
        name: impl Into<String>,
        parents: &BTreeMap<String, String>,
    ) -> Result<Self, TranslationError> {
        let name = name.into();
        let mut tree = LocaleTree::new();
        for locale in parents.keys() {
            let path = Self::path_to(&name, locale, parents)?;
            let path: Vec<&str> = path.iter().map(String::as_str).collect();
            tree.insert(&path, locale);
        }
        Ok(Self { name, tree })
    }

    /// Ancestors of `locale`, root first.
    fn path_to(
        name: &str,
        locale: &str,
        parents: &BTreeMap<String, String>,
    ) -> Result<Vec<String>, TranslationError> {
        let mut path = Vec::new();
        let mut current = locale;
        loop {
            let parent = parents.get(current).ok_or_else(|| TranslationError::InvalidConfiguration {
                message: format!("locale '{current}' is not declared").into(),
                context: Some(format!("strategy '{name}'").into()),
            })?;
            if parent.is_empty() {
                break;
            }
            if parent == locale || path.contains(parent) {
                return Err(TranslationError::InvalidConfiguration {
                    message: format!("fallback cycle through '{parent}'").into(),
                    context: Some(format!("strategy '{name}'").into()),
                });
            }
            path.push(parent.clone());
            current = parent;
        }
        path.reverse();
        Ok(path)
    }
}

impl TranslationStrategy for StaticTranslationStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn locale_fallbacks(&self) -> LocaleTree {
        self.tree.clone()
    }
}
