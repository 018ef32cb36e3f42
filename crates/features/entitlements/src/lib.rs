//! Entitlement evaluation for the platform's service bundles.
//!
//! * [`BundleCatalog`]: the bundle definitions, loaded from YAML.
//! * [`CatalogStore`]: publishes the catalog in effect and swaps it on reload.
//! * [`evaluate`]: computes one [`EntitlementVerdict`] per bundle for a caller.
//! * [`map_dependency_failure`]: turns a failed upstream lookup into the error envelope.
//!
//! Evaluation and mapping are synchronous and pure; only the lookup in front of them does I/O.

pub mod catalog;
pub mod dependency;
mod error;
pub mod evaluator;
mod store;

pub use catalog::{BundleCatalog, BundleDefinition, SkuAttributes};
pub use dependency::{DependencyErrorDetail, DependencyErrorResponse, map_dependency_failure};
pub use error::{CatalogError, CatalogErrorExt};
pub use evaluator::{EntitlementVerdict, Entitlements, evaluate, is_valid_account_number};
pub use store::CatalogStore;
