use std::borrow::Cow;

#[rosetta_derive::rosetta_error]
pub enum CatalogueError {
    #[error("Missing file{}: {source}", format_context(.context))]
    Missing { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, CatalogueError> {
    std::fs::read("/definitely/not/here/catalogue.en.bin").context("Reading compiled catalogue")
}

fn reject() -> Result<(), CatalogueError> {
    Err(CatalogueError::Rejected { message: "bad locale".into(), context: None })
}

fn main() {
    let err = read().unwrap_err();
    assert!(err.to_string().contains("(Reading compiled catalogue)"));

    let err = reject().context("Validating locale").unwrap_err();
    assert_eq!(err.to_string(), "Rejected (Validating locale): bad locale");
}
