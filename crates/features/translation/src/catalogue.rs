//! The [`MessageCatalogue`]: every message of one locale, grouped by domain,
//! optionally linked to the catalogue of its fallback locale.

use crate::error::TranslationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message id to translated text.
pub type Messages = BTreeMap<String, String>;

/// Domain to [`Messages`].
pub type DomainMessages = BTreeMap<String, Messages>;

/// Messages of one locale plus a linear chain of fallback catalogues.
///
/// The chain is owned, so it always terminates. Each link only holds the own
/// messages of its locale.
///
/// ```rust
/// use rosetta_translation::MessageCatalogue;
///
/// let mut en = MessageCatalogue::new("en");
/// en.set("greeting", "Hello", "messages");
///
/// let mut fr = MessageCatalogue::new("fr");
/// fr.set_fallback_catalogue(en);
///
/// assert!(!fr.defines("greeting", "messages"));
/// assert!(fr.has("greeting", "messages"));
/// assert_eq!(fr.get("greeting", "messages"), Some("Hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCatalogue {
    locale: String,
    messages: DomainMessages,
    fallback: Option<Box<MessageCatalogue>>,
}

impl MessageCatalogue {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into(), messages: BTreeMap::new(), fallback: None }
    }

    #[must_use]
    pub fn with_messages(locale: impl Into<String>, messages: DomainMessages) -> Self {
        Self { locale: locale.into(), messages, fallback: None }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Own messages of every domain, fallbacks excluded.
    #[must_use]
    pub const fn all(&self) -> &DomainMessages {
        &self.messages
    }

    /// Own messages of one domain.
    #[must_use]
    pub fn domain(&self, domain: &str) -> Option<&Messages> {
        self.messages.get(domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Resolves `id` through this catalogue and then its fallbacks.
    #[must_use]
    pub fn get(&self, id: &str, domain: &str) -> Option<&str> {
        self.chain().find_map(|catalogue| catalogue.own(id, domain))
    }

    /// Whether this catalogue itself defines `id`.
    #[must_use]
    pub fn defines(&self, id: &str, domain: &str) -> bool {
        self.own(id, domain).is_some()
    }

    /// Whether `id` is defined by this catalogue or any fallback.
    #[must_use]
    pub fn has(&self, id: &str, domain: &str) -> bool {
        self.chain().any(|catalogue| catalogue.defines(id, domain))
    }

    pub fn set(&mut self, id: impl Into<String>, translation: impl Into<String>, domain: &str) {
        self.messages.entry(domain.to_owned()).or_default().insert(id.into(), translation.into());
    }

    /// Adds messages to a domain; incoming values replace existing ones.
    pub fn add(&mut self, messages: Messages, domain: &str) {
        self.messages.entry(domain.to_owned()).or_default().extend(messages);
    }

    /// Merges the own messages of `other`; `other` wins on conflicts.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidArgument`] when the locales differ.
    pub fn add_catalogue(&mut self, other: &Self) -> Result<(), TranslationError> {
        if other.locale != self.locale {
            return Err(TranslationError::InvalidArgument {
                message: format!(
                    "cannot merge catalogue '{}' into catalogue '{}'",
                    other.locale, self.locale
                )
                .into(),
                context: None,
            });
        }
        for (domain, messages) in &other.messages {
            self.add(messages.clone(), domain);
        }
        Ok(())
    }

    pub fn set_fallback_catalogue(&mut self, fallback: Self) {
        self.fallback = Some(Box::new(fallback));
    }

    #[must_use]
    pub fn fallback_catalogue(&self) -> Option<&Self> {
        self.fallback.as_deref()
    }

    /// This catalogue followed by every fallback, most specific first.
    #[must_use]
    pub const fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// A copy of this catalogue without its fallback chain.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self::with_messages(self.locale.clone(), self.messages.clone())
    }

    /// Number of own messages across all domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.values().all(BTreeMap::is_empty)
    }

    pub(crate) fn messages_mut(&mut self) -> &mut DomainMessages {
        &mut self.messages
    }

    fn own(&self, id: &str, domain: &str) -> Option<&str> {
        self.messages.get(domain).and_then(|m| m.get(id)).map(String::as_str)
    }
}

/// Iterator over a catalogue and its fallbacks.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a MessageCatalogue>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a MessageCatalogue;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.fallback.as_deref();
        Some(current)
    }
}
