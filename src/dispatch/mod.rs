//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → classify.rs (Control | ShellSession | TargetApp, path prefix only)
//!     → signals.rs (scheme, host, path, query, system-origin markers)
//!     → tenant resolution + isolation scope (tenant subsystem)
//!     → route table load + match (routes subsystem)
//!     → secure-redirect check, authorization (authz subsystem)
//!     → static / script dispatch via collaborators
//!     → scope restored (always, Drop-based)
//! ```
//!
//! # Design Decisions
//! - One deterministic decision per request; no retries, no fallbacks
//! - Every tenant-facing error converts to an HTTP response here
//! - Tenant configuration problems are Not-Found-class, never 5xx

pub mod classify;
pub mod dispatcher;
pub mod error;
pub mod respond;
pub mod signals;

pub use classify::{classify, RequestClass};
pub use dispatcher::{Collaborators, Dispatcher};
pub use error::DispatchError;
pub use signals::RequestSignals;
