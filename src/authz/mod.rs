//! Per-route authorization subsystem.
//!
//! # Design Decisions
//! - The current-user lookup happens once per request; the cached identity
//!   is reused for denial messaging
//! - System-originated requests (task queue, scheduled work) are admin
//!   equivalents and always pass
//! - Fail closed: anything not explicitly allowed is denied

pub mod gate;
pub mod identity;

pub use gate::{authorize, AuthorizationDecision};
pub use identity::{CallerIdentity, IdentityProvider};
