//! Kernel utilities shared by the service crates.
//! Keep this crate lightweight: configuration loading plus the HTTP plumbing every router needs
//! (identity extraction, health, system routes).
//!
//! ## Config loading
//! ```rust,ignore
//! use ent_kernel::config::load_config;
//! let cfg: ent_kernel::domain::config::ApiConfig = load_config(Some("entitlements.toml"))?;
//! ```
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use ent_domain as domain;
