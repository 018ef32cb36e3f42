//! Extracts the caller identity from the `x-rh-identity` header.
//!
//! The gateway has already authenticated the caller; this extractor only decodes what it
//! forwarded and refuses requests that carry no usable organization.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ent_domain::constants::IDENTITY_HEADER;
use ent_domain::identity::{Identity, IdentityEnvelope};
use serde_json::json;
use std::ops::Deref;

/// Axum extractor wrapping the resolved [`Identity`].
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Identity);

impl Deref for RequestIdentity {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Why a request was refused before reaching the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityRejection {
    Missing,
    Malformed(String),
    MissingOrgId,
}

impl IdentityRejection {
    fn message(&self) -> String {
        match self {
            Self::Missing => format!("Missing {IDENTITY_HEADER} header"),
            Self::Malformed(reason) => format!("Malformed {IDENTITY_HEADER} header: {reason}"),
            Self::MissingOrgId => "Identity carries no org_id".to_owned(),
        }
    }
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        tracing::warn!(reason = %self.message(), "Rejecting request without usable identity");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": { "message": self.message() } })))
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(IDENTITY_HEADER).ok_or(IdentityRejection::Missing)?;
        decode_identity(raw.as_bytes()).map(Self)
    }
}

/// Decodes a base64 identity document into an [`Identity`].
pub(crate) fn decode_identity(raw: &[u8]) -> Result<Identity, IdentityRejection> {
    let bytes = STANDARD
        .decode(raw.trim_ascii())
        .map_err(|e| IdentityRejection::Malformed(format!("invalid base64: {e}")))?;
    let envelope: IdentityEnvelope = serde_json::from_slice(&bytes)
        .map_err(|e| IdentityRejection::Malformed(format!("invalid JSON: {e}")))?;

    envelope.resolve().ok_or(IdentityRejection::MissingOrgId)
}
