use crate::state::ApiState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ent_entitlements::{DependencyErrorResponse, Entitlements, evaluate, map_dependency_failure};
use ent_kernel::domain::constants::ENTITLEMENTS_TAG;
use ent_kernel::server::RequestIdentity;
use tracing::{debug, error};

/// Evaluates every configured bundle for the calling organization.
#[utoipa::path(
    get,
    path = "/services",
    params(("x-rh-identity" = String, Header, description = "Base64-encoded platform identity")),
    responses(
        (status = OK, description = "Verdict for every bundle", body = Entitlements),
        (status = BAD_REQUEST, description = "Missing or undecodable identity"),
        (status = INTERNAL_SERVER_ERROR, description = "Subscriptions Service failed", body = DependencyErrorResponse),
    ),
    tag = ENTITLEMENTS_TAG,
)]
pub(crate) async fn services_handler(
    State(state): State<ApiState>,
    identity: RequestIdentity,
) -> Response {
    let catalog = state.catalog.snapshot();
    let sku_filter = catalog.sku_filter();

    let result = state.subscriptions.lookup(&identity.org_id, sku_filter.as_deref()).await;

    if let Some(detail) = map_dependency_failure(&result) {
        error!(
            org_id = %identity.org_id,
            status = detail.status,
            transport_error = result.transport_error.as_deref(),
            "{}",
            detail.message
        );
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(DependencyErrorResponse::from(detail)))
            .into_response();
    }

    let verdicts = evaluate(&catalog, &identity.account_number, &result.skus);
    debug!(
        org_id = %identity.org_id,
        bundles = verdicts.len(),
        granted = verdicts.granted(),
        cache_hit = result.cache_hit,
        "Entitlements evaluated"
    );

    (StatusCode::OK, Json(verdicts)).into_response()
}
