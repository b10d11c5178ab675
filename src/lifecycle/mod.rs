//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - Ordered startup: config first, then subsystems, listeners last
//! - Shutdown is a broadcast every long-running task subscribes to
//! - Signals translate to internal events, never act directly

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
