use crate::handlers;
use crate::state::ApiState;
use axum::routing::get;
use axum::{Json, Router};
use ent_kernel::domain::constants::API_BASE;
use ent_kernel::server::router::system_router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Entitlements", description = "Bundle entitlements of the calling organization"))]
struct ApiDoc;

fn entitlements_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(handlers::services_handler))
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let (api_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .nest(API_BASE, entitlements_router())
        .route("/", get(handlers::services_handler))
        .with_state(state)
        .split_for_parts();

    let document = api_doc.clone();
    let docs = Scalar::with_url(format!("{API_BASE}/docs"), api_doc);

    Router::new()
        .merge(api_routes)
        .route(&format!("{API_BASE}/openapi.json"), get(move || async move { Json(document) }))
        .merge(docs)
        .layer(TraceLayer::new_for_http())
}
