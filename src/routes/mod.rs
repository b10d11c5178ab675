//! Tenant route-table subsystem.
//!
//! # Data Flow
//! ```text
//! tenant tree: app.yaml (raw bytes)
//!     → table.rs (parse handlers in declaration order)
//!     → rule.rs (Static / Script sum type)
//!     → matcher.rs (linear first-match scan per request)
//! ```
//!
//! # Design Decisions
//! - The table is rebuilt from the document on every request; the document
//!   is authoritative live state, never cached
//! - Declaration order is preserved exactly: a Vec, no hashing, no sorting
//! - Unrecognized handler shapes are structural errors, never dropped

pub mod matcher;
pub mod rule;
pub mod table;

pub use rule::{LoginRequirement, RouteRule, SecurityLevel};
pub use table::{ConfigDocError, RouteTable};
