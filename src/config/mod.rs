//! Deployment configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → semantic validation
//!     → RouterConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → atomic swap of the platform section (arc-swap)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Only the platform section is hot-swappable; listener changes need a restart

pub mod loader;
pub mod schema;
pub mod watcher;

pub use schema::PlatformConfig;
pub use schema::RouterConfig;
