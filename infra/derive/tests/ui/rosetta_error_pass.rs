use rosetta_derive::rosetta_error;
use std::borrow::Cow;

#[rosetta_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: DemoError = "boom".into();
    assert_eq!(err.kind(), "Internal");

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: DemoError = io.into();
    assert_eq!(err.kind(), "Io");
}
