use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[rosetta_derive::rosetta_error]
pub enum EventBusError {
    /// An internal downcast failed; the type registry invariant is broken.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The bus was shut down and no longer accepts publishers or subscribers.
    #[error("Event bus closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
