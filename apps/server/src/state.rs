use ent_entitlements::CatalogStore;
use ent_kernel::domain::config::ApiConfig;
use ent_subscriptions::SubscriptionLookup;
use std::sync::Arc;

/// Shared application state, cloned into every request.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub config: ApiConfig,
    /// Bundle catalog in effect; swapped on reload.
    pub catalog: Arc<CatalogStore>,
    pub subscriptions: Arc<dyn SubscriptionLookup>,
}
