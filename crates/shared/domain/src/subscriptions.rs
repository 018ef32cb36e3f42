//! Outcome of a Subscriptions Service lookup.

use std::borrow::Cow;

/// Status used when no HTTP response was received at all.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// What the upstream lookup produced for one organization.
///
/// A lookup never fails as a Rust `Result`: transport failures and non-200 answers are both
/// carried here so the request boundary can map them to one error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionLookupResult {
    pub status_code: u16,
    /// SKUs in upstream order; may contain duplicates.
    pub skus: Vec<String>,
    /// The call itself failed (connect, TLS, timeout, undecodable body).
    pub transport_error: Option<Cow<'static, str>>,
    /// Served from the client cache rather than the network.
    pub cache_hit: bool,
}

impl SubscriptionLookupResult {
    pub fn ok(skus: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            status_code: 200,
            skus: skus.into_iter().map(Into::into).collect(),
            transport_error: None,
            cache_hit: false,
        }
    }

    #[must_use]
    pub const fn status(status_code: u16) -> Self {
        Self { status_code, skus: Vec::new(), transport_error: None, cache_hit: false }
    }

    pub fn transport(status_code: u16, error: impl Into<Cow<'static, str>>) -> Self {
        Self { status_code, skus: Vec::new(), transport_error: Some(error.into()), cache_hit: false }
    }

    /// A clean 200 with no transport error.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.transport_error.is_none() && self.status_code == 200
    }
}
