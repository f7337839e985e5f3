#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the Rosetta workspace.
//!
//! ## Usage
//! Every infrastructure and feature crate declares its error enum with
//! [`macro@rosetta_error`]:
//! ```toml
//! [dependencies]
//! rosetta-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to `Result<T, Self>` and to `Result<T, Source>` for every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants containing a
///   `source` field (or a field marked `#[source]`/`#[from]`), enabling `?`.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
/// * **Kind Introspection**: `kind()` returns the variant name, which is what
///   the workspace logs as the `error.kind` field.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants wrapping a source error must carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[rosetta_derive::rosetta_error]
/// pub enum CatalogueError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<Vec<u8>, CatalogueError> {
///     std::fs::read(path).context("Reading compiled catalogue")
/// }
/// ```
#[proc_macro_attribute]
pub fn rosetta_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
