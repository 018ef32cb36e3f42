//! # Domain Models
//!
//! Pure data shared by every crate in the workspace: configuration, the caller identity and
//! the outcome of a Subscriptions Service lookup. Keep it lean: no I/O, networking, or
//! decision logic.

pub mod config;
pub mod constants;
pub mod identity;
pub mod subscriptions;
