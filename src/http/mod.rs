//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, timeouts, request IDs)
//!     → dispatch subsystem (routing decision)
//!     → response to client
//! ```

pub mod server;

pub use server::{AppState, RouterServer};
