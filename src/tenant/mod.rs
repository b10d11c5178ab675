//! Tenant identification and isolation subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request signals (headers, query, path, host)
//!     → resolver.rs (precedence chain, first non-empty wins)
//!     → namespace.rs (validate id, enter isolation scope)
//!     → scope restored on every exit path (RAII guard)
//!
//! Dev-only fallback:
//!     sticky.rs remembers the last query-parameter tenant id
//!     → consulted only when no other signal resolves
//! ```
//!
//! # Design Decisions
//! - The sticky slot is an injected trait object, never a process global;
//!   production wires the disabled implementation
//! - Namespace validation happens before any tree access
//! - The active namespace lives in a task-local slot, one per scoped
//!   request future; concurrent requests never observe each other's scope
//! - Scope teardown is Drop-based so no error path can skip it

pub mod namespace;
pub mod resolver;
pub mod sticky;

pub use namespace::{InvalidTenantId, NamespaceManager, ScopeGuard, TenantId};
pub use resolver::TenantResolver;
pub use sticky::{DisabledStickyStore, InMemoryStickyStore, StickyTenantStore};
