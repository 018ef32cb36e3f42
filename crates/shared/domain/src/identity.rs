//! The caller identity as forwarded by the platform gateway.
//!
//! The gateway sends `x-rh-identity: base64({"identity": {...}})`; decoding the header is the
//! kernel's job, this module only describes the JSON shape and the resolved identity.

use serde::Deserialize;

/// Identity resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Billing account number; empty when the caller has none.
    pub account_number: String,
    pub org_id: String,
}

/// Outer `{"identity": ...}` wrapper of the header document.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEnvelope {
    pub identity: IdentityDocument,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdentityDocument {
    pub account_number: Option<String>,
    pub org_id: Option<String>,
    pub internal: InternalIdentity,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InternalIdentity {
    pub org_id: Option<String>,
}

impl IdentityEnvelope {
    /// Resolves the identity; `internal.org_id` wins over the top-level `org_id`.
    ///
    /// Returns `None` when neither carries a non-empty org id.
    #[must_use]
    pub fn resolve(self) -> Option<Identity> {
        let IdentityDocument { account_number, org_id, internal, .. } = self.identity;
        let org_id = internal.org_id.filter(|id| !id.is_empty()).or(org_id)?;
        if org_id.is_empty() {
            return None;
        }

        Some(Identity { account_number: account_number.unwrap_or_default(), org_id })
    }
}
