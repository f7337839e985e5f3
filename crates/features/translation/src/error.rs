use std::borrow::Cow;

/// Errors raised by catalogue loading, lookups and cache maintenance.
#[rosetta_derive::rosetta_error]
pub enum TranslationError {
    /// The message id is not defined anywhere in the fallback chain.
    #[error("Missing message{}: {message}", format_context(.context))]
    MissingMessage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A plural choice could not be resolved for the given `%count%`.
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid locale{}: {message}", format_context(.context))]
    InvalidLocale { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No loader is registered for the resource format.
    #[error("Missing loader{}: {message}", format_context(.context))]
    MissingLoader { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown strategy{}: {message}", format_context(.context))]
    UnknownStrategy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A resource cannot be handled by the loader it was registered for.
    #[error("Invalid resource{}: {message}", format_context(.context))]
    InvalidResource { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The remote translation service could not deliver metrics.
    #[error("Translation service error{}: {message}", format_context(.context))]
    Service { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A compiled catalogue could not be encoded or decoded.
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialize { source: postcard::Error, context: Option<Cow<'static, str>> },

    #[error("Storage error{}: {source}", format_context(.context))]
    Storage { source: rosetta_storage::StorageError, context: Option<Cow<'static, str>> },

    #[error("Event dispatch error{}: {source}", format_context(.context))]
    Event { source: rosetta_event_bus::EventBusError, context: Option<Cow<'static, str>> },
}

impl TranslationError {
    /// Whether the error is a lookup failure that `Translator::trans` recovers from.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::MissingMessage { .. } | Self::InvalidArgument { .. })
    }
}
