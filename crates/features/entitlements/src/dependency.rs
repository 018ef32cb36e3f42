//! Maps a failed Subscriptions Service lookup to the error envelope returned to callers.

use ent_domain::constants::{SUBSCRIPTIONS_ENDPOINT, SUBSCRIPTIONS_SERVICE};
use ent_domain::subscriptions::SubscriptionLookupResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TRANSPORT_FAILURE_MESSAGE: &str = "Unexpected error while talking to Subs Service";
pub const NON_SUCCESS_MESSAGE: &str = "Got back a non 200 status code from Subscriptions Service";

/// Body of the `error` object in a dependency-failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DependencyErrorDetail {
    /// Always `true`.
    pub dependency_failure: bool,
    #[serde(rename = "service")]
    pub service_name: String,
    /// Upstream HTTP status; `0` when no response was received.
    pub status: u16,
    pub endpoint: String,
    pub message: String,
}

/// `{"error": {...}}` wrapper sent with `500 Internal Server Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DependencyErrorResponse {
    pub error: DependencyErrorDetail,
}

impl DependencyErrorDetail {
    fn subscriptions(status: u16, message: &str) -> Self {
        Self {
            dependency_failure: true,
            service_name: SUBSCRIPTIONS_SERVICE.to_owned(),
            status,
            endpoint: SUBSCRIPTIONS_ENDPOINT.to_owned(),
            message: message.to_owned(),
        }
    }
}

impl From<DependencyErrorDetail> for DependencyErrorResponse {
    fn from(error: DependencyErrorDetail) -> Self {
        Self { error }
    }
}

/// `None` for a clean 200 (whatever its payload), otherwise the detail to report.
///
/// A transport error wins over the status code.
#[must_use]
pub fn map_dependency_failure(result: &SubscriptionLookupResult) -> Option<DependencyErrorDetail> {
    if result.transport_error.is_some() {
        return Some(DependencyErrorDetail::subscriptions(
            result.status_code,
            TRANSPORT_FAILURE_MESSAGE,
        ));
    }
    if result.status_code != 200 {
        return Some(DependencyErrorDetail::subscriptions(result.status_code, NON_SUCCESS_MESSAGE));
    }
    None
}
