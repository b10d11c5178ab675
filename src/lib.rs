//! Multi-tenant request router library.

pub mod authz;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod platform;
pub mod routes;
pub mod tenant;

pub use config::schema::RouterConfig;
pub use dispatch::dispatcher::{Collaborators, Dispatcher};
pub use http::RouterServer;
pub use lifecycle::Shutdown;
