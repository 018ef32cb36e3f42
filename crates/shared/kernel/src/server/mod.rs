mod health;
mod identity;
pub mod router;

pub use health::HealthResponse;
pub use identity::{IdentityRejection, RequestIdentity};
