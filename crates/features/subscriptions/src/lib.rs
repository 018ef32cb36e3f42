//! # Subscriptions Service Client
//!
//! Looks up the SKUs an organization currently owns.
//!
//! * [`SubscriptionLookup`]: the capability the request handler depends on.
//! * [`SubscriptionsClient`]: the production implementation over `reqwest`, with optional mutual
//!   TLS and a `moka` cache of successful answers.
//!
//! ## Example
//!
//! ```no_run
//! use ent_subscriptions::{SubscriptionLookup, SubscriptionsClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), ent_subscriptions::SubscriptionsError> {
//! let client = SubscriptionsClient::builder()
//!     .host("https://subscription.api.redhat.com")
//!     .timeout(Duration::from_secs(5))
//!     .build()?;
//!
//! let result = client.lookup("4384938490324", Some("MCT1122,SVC3124")).await;
//! if result.is_success() {
//!     assert!(result.skus.iter().all(|sku| !sku.is_empty()));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod lookup;
mod wire;

pub use client::{SubscriptionsClient, SubscriptionsClientBuilder};
pub use error::{SubscriptionsError, SubscriptionsErrorExt};
pub use lookup::SubscriptionLookup;
