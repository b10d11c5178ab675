//! Tenant resolution from request signals.
//!
//! # Responsibilities
//! - Try each tenant id source in a fixed precedence order
//! - Derive tenant ids from the host header (subdomain addressing)
//! - Record and consult the sticky fallback slot
//!
//! # Design Decisions
//! - First non-empty source wins; sources never combine
//! - Host derivation is pure string inspection, no DNS
//! - The returned id is raw; the caller validates it before namespace use

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::config::PlatformConfig;
use crate::dispatch::signals::RequestSignals;
use crate::tenant::sticky::StickyTenantStore;

/// Resolves the owning tenant for a request.
///
/// Precedence: platform namespace header (task/queue requests), explicit
/// query parameter, path-embedded id, host-derived id, sticky fallback.
pub struct TenantResolver {
    sticky: Arc<dyn StickyTenantStore>,
}

impl TenantResolver {
    pub fn new(sticky: Arc<dyn StickyTenantStore>) -> Self {
        Self { sticky }
    }

    /// Resolve a raw tenant id, or `None` when no source yields one.
    ///
    /// Query-parameter hits are recorded into the sticky store; a disabled
    /// store makes that a no-op.
    pub fn resolve(&self, signals: &RequestSignals, platform: &PlatformConfig) -> Option<String> {
        if let Some(id) = signals.namespace_header.as_deref().filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }

        if let Some(id) = from_query(&signals.query, &platform.tenant_query_param) {
            self.sticky.record(&id);
            return Some(id);
        }

        if let Some(prefix) = platform.tenant_path_prefix.as_deref() {
            if let Some(id) = from_path(&signals.path, prefix) {
                return Some(id);
            }
        }

        if let Some(id) = from_host(&signals.host, platform) {
            return Some(id);
        }

        self.sticky.load()
    }
}

/// Extract the tenant id from the query string.
fn from_query(query: &str, param: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Extract the tenant id embedded in the request path under `prefix`.
fn from_path(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    let segment = rest.trim_start_matches('/').split('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Derive the tenant id from the HTTP host.
///
/// The id is addressed as a "subdomain" of the application host, either
/// `acme.router.example.com` or `acme-dot-router.example.com`. Hosts that
/// cannot carry a tenant id (localhost, IPv4 literals, the apex host
/// itself, the platform default hostname) yield `None`. Any other host
/// contributes its left-most label.
fn from_host(host: &str, platform: &PlatformConfig) -> Option<String> {
    // normalize the alternate subdomain delimiter, then drop any port
    let host = host.replace("-dot-", ".");
    let host = host.split(':').next().unwrap_or_default();

    if host.is_empty() || host == "localhost" {
        return None;
    }
    if host.parse::<Ipv4Addr>().is_ok() {
        return None;
    }
    if !platform.apex_domain.is_empty() && host == platform.apex_domain {
        return None;
    }
    if !platform.default_hostname.is_empty() && host == platform.default_hostname {
        return None;
    }

    host.split('.').next().map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::sticky::{DisabledStickyStore, InMemoryStickyStore};

    fn platform() -> PlatformConfig {
        PlatformConfig {
            apex_domain: "myapp.example.com".to_string(),
            default_hostname: "custom.host.example".to_string(),
            ..PlatformConfig::default()
        }
    }

    fn signals(host: &str, path: &str, query: &str) -> RequestSignals {
        RequestSignals {
            scheme: "http".to_string(),
            host: host.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            namespace_header: None,
            system_originated: false,
        }
    }

    fn resolver() -> TenantResolver {
        TenantResolver::new(Arc::new(DisabledStickyStore))
    }

    #[test]
    fn host_derivation_table() {
        let platform = platform();
        let cases = [
            ("proj1.myapp.example.com", Some("proj1")),
            ("proj1.myapp.example.com:12345", Some("proj1")),
            ("proj1-dot-myapp.example.com", Some("proj1")),
            ("myapp.example.com", None),
            ("other.myapp.example.com", Some("other")),
            ("www.mydomain.com", Some("www")),
            ("proj2.www.mydomain.com", Some("proj2")),
            ("custom.host.example", None),
            ("localhost", None),
            ("localhost:8080", None),
            ("192.168.0.1", None),
            ("", None),
        ];
        for (host, expected) in cases {
            assert_eq!(
                from_host(host, &platform).as_deref(),
                expected,
                "host {host:?}"
            );
        }
    }

    #[test]
    fn query_parameter_beats_host() {
        let resolved = resolver().resolve(
            &signals("proj1.myapp.example.com", "/", "tenant_id=acme"),
            &platform(),
        );
        assert_eq!(resolved.as_deref(), Some("acme"));
    }

    #[test]
    fn namespace_header_beats_query_parameter() {
        let mut sig = signals("localhost", "/", "tenant_id=acme");
        sig.namespace_header = Some("queued-tenant".to_string());
        let resolved = resolver().resolve(&sig, &platform());
        assert_eq!(resolved.as_deref(), Some("queued-tenant"));
    }

    #[test]
    fn path_embedded_id() {
        let mut platform = platform();
        platform.tenant_path_prefix = Some("/_tenant".to_string());
        let resolved = resolver().resolve(&signals("localhost", "/_tenant/acme/index.html", ""), &platform);
        assert_eq!(resolved.as_deref(), Some("acme"));
    }

    #[test]
    fn sticky_fallback_remembers_query_hits() {
        let sticky = Arc::new(InMemoryStickyStore::default());
        let resolver = TenantResolver::new(sticky);
        let platform = platform();

        let first = resolver.resolve(&signals("localhost", "/", "tenant_id=acme"), &platform);
        assert_eq!(first.as_deref(), Some("acme"));

        let second = resolver.resolve(&signals("localhost", "/", ""), &platform);
        assert_eq!(second.as_deref(), Some("acme"));
    }

    #[test]
    fn disabled_sticky_store_resolves_nothing() {
        let resolver = resolver();
        let platform = platform();

        resolver.resolve(&signals("localhost", "/", "tenant_id=acme"), &platform);
        let second = resolver.resolve(&signals("localhost", "/", ""), &platform);
        assert_eq!(second, None);
    }

    #[test]
    fn host_derived_ids_are_not_recorded_sticky() {
        let sticky = Arc::new(InMemoryStickyStore::default());
        let resolver = TenantResolver::new(sticky);
        let platform = platform();

        let first = resolver.resolve(&signals("proj1.myapp.example.com", "/", ""), &platform);
        assert_eq!(first.as_deref(), Some("proj1"));

        let second = resolver.resolve(&signals("localhost", "/", ""), &platform);
        assert_eq!(second, None);
    }
}
