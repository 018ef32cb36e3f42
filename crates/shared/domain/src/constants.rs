//! Fixed identifiers shared by the server, the client and the error envelope.

/// Display name of the upstream dependency in error envelopes.
pub const SUBSCRIPTIONS_SERVICE: &str = "Subscriptions Service";

/// Base URL of the upstream dependency, reported in error envelopes.
pub const SUBSCRIPTIONS_ENDPOINT: &str = "https://subscription.api.redhat.com";

/// Header carrying the base64-encoded platform identity document.
pub const IDENTITY_HEADER: &str = "x-rh-identity";

/// Account numbers that denote system/service accounts without a billing identity.
pub const PLACEHOLDER_ACCOUNT_NUMBERS: [&str; 2] = ["", "-1"];

pub const API_BASE: &str = "/api/entitlements/v1";
pub const SYSTEM_TAG: &str = "System";
pub const ENTITLEMENTS_TAG: &str = "Entitlements";
