use async_trait::async_trait;
use ent_domain::subscriptions::SubscriptionLookupResult;
use std::fmt::Debug;

/// Source of the SKUs an organization currently owns.
///
/// Implementations fold every failure into the returned result so the caller decides how to
/// report it; the request handler depends on this trait, never on a concrete client.
#[async_trait]
pub trait SubscriptionLookup: Debug + Send + Sync {
    /// `sku_filter` is a comma-joined allow-list hint forwarded upstream as-is.
    async fn lookup(&self, org_id: &str, sku_filter: Option<&str>) -> SubscriptionLookupResult;
}

