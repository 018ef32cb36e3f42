#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the entitlements workspace.
//!
//! Every crate declares its error enum with [`macro@ent_error`], so errors look and compose the
//! same way across the catalog loader, the subscriptions client, the logger and the kernel.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining a crate's error enum.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless the enum already derives them.
/// * A `<Name>Ext<T>` trait with `.context(...)` for `Result<T, Name>`, and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for each variant with a `source` field (or a field marked `#[source]`).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// * Applied to an enum with named-field variants only.
/// * A variant wrapping a source must carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[ent_derive::ent_error]
/// pub enum CatalogError {
///     #[error("Bundle file unreadable{}: {source}", format_context(.context))]
///     Load { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal catalog error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, CatalogError> {
///     std::fs::read_to_string(path).context("Reading bundle file")
/// }
/// ```
#[proc_macro_attribute]
pub fn ent_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
