use std::borrow::Cow;

/// Errors raised while building a [`crate::BundleCatalog`].
///
/// `Load` means the source could not be read; `Parse` and `Invalid` both mean the document is
/// malformed (syntax/shape versus content rules such as duplicate names). `NoSource` is a
/// reload request on a store that was never given a file.
#[ent_derive::ent_error]
pub enum CatalogError {
    #[error("Bundle catalog unreadable{}: {source}", format_context(.context))]
    Load { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Bundle catalog malformed{}: {source}", format_context(.context))]
    Parse { source: serde_yaml::Error, context: Option<Cow<'static, str>> },

    #[error("Bundle catalog invalid{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Bundle catalog has no source file to reload from{}", format_context(.context))]
    NoSource { context: Option<Cow<'static, str>> },
}

impl CatalogError {
    /// The configuration source itself could not be read.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// The configuration source was read but its content is not a valid catalog.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Invalid { .. })
    }
}
