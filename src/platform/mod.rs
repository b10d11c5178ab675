//! External collaborator contracts.
//!
//! The router never performs blocking I/O itself; the tenant tree, script
//! execution and control-plane handling are all behind these traits, and
//! their latency and failure modes are opaque to the dispatch core.
//! `local.rs` carries the baseline implementations the binary wires up.

pub mod control;
pub mod local;
pub mod script;
pub mod tree;

pub use control::{ControlPlane, ShellBackend};
pub use script::{ScriptError, ScriptRunner};
pub use tree::{Tree, TreeProvider};
