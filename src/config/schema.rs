//! Configuration schema definitions.
//!
//! This module defines the complete deployment configuration for the router.
//! All types derive Serde traits for deserialization from config files.
//! Tenant-facing route tables are *not* part of this schema; those live in
//! each tenant's own configuration document (see [`crate::routes::table`]).

use serde::{Deserialize, Serialize};

/// Root configuration for the router process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Platform settings: request classification and tenant resolution.
    pub platform: PlatformConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Platform settings shared by request classification, tenant resolution
/// and dispatch. Exact prefix strings and header names are deployment
/// configuration, not fixed by the router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Path prefix for control-plane requests.
    pub control_prefix: String,

    /// Path prefix for interactive shell sessions.
    pub shell_prefix: String,

    /// Query parameter carrying an explicit tenant id.
    pub tenant_query_param: String,

    /// Optional path prefix under which the tenant id is embedded as the
    /// next path segment (e.g. "/_tenant/" for "/_tenant/acme/index.html").
    pub tenant_path_prefix: Option<String>,

    /// Header attached by the platform to task/queue-originated requests,
    /// carrying the namespace the work item was enqueued under.
    pub namespace_header: String,

    /// Header marking task-queue-originated requests.
    pub queue_header: String,

    /// Header marking scheduled (cron-equivalent) requests.
    pub cron_header: String,

    /// Apex domain under which tenants are addressed as subdomains
    /// (e.g. "router-app.example.com" makes "acme.router-app.example.com"
    /// resolve to tenant "acme"). Empty disables the bare-host check.
    pub apex_domain: String,

    /// The platform's own default hostname; requests addressed to it carry
    /// no host-derived tenant id. Empty disables the check.
    pub default_hostname: String,

    /// Development deployment. Disables the https redirect for
    /// secure-always routes.
    pub dev_mode: bool,

    /// Remember the most recently seen query-parameter tenant id and fall
    /// back to it when no other signal resolves. Single-worker/dev only.
    pub sticky_fallback: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            control_prefix: "/_control".to_string(),
            shell_prefix: "/_shell".to_string(),
            tenant_query_param: "tenant_id".to_string(),
            tenant_path_prefix: None,
            namespace_header: "x-tenant-namespace".to_string(),
            queue_header: "x-task-queue-name".to_string(),
            cron_header: "x-scheduled-task".to_string(),
            apex_domain: String::new(),
            default_hostname: String::new(),
            dev_mode: false,
            sticky_fallback: false,
        }
    }
}
