//! Request signals relevant to routing decisions.
//!
//! Extracted once per request so the resolver, the authorization gate and
//! URL reconstruction all see the same values.

use axum::body::Body;
use axum::http::Request;

use crate::config::PlatformConfig;

/// The inbound fields the routing core consumes.
#[derive(Debug, Clone)]
pub struct RequestSignals {
    /// Inbound scheme ("http" or "https"), honoring `x-forwarded-proto`.
    pub scheme: String,
    /// Host header (or HTTP/2 authority), verbatim including any port.
    pub host: String,
    pub path: String,
    /// Raw query string, empty when absent.
    pub query: String,
    /// Namespace attached by the platform to task/queue-originated requests.
    pub namespace_header: Option<String>,
    /// Task-queue or scheduled-work markers are present.
    pub system_originated: bool,
}

impl RequestSignals {
    pub fn extract(request: &Request<Body>, platform: &PlatformConfig) -> Self {
        let headers = request.headers();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        let host = header("host")
            .or_else(|| request.uri().authority().map(|a| a.to_string()))
            .unwrap_or_default();
        let scheme = header("x-forwarded-proto")
            .or_else(|| request.uri().scheme_str().map(ToString::to_string))
            .unwrap_or_else(|| "http".to_string());

        Self {
            scheme,
            host,
            path: request.uri().path().to_string(),
            query: request.uri().query().unwrap_or_default().to_string(),
            namespace_header: header(&platform.namespace_header),
            system_originated: header(&platform.queue_header).is_some()
                || header(&platform.cron_header).is_some(),
        }
    }

    /// Reconstruct the current URL (scheme, host, path, query).
    pub fn current_url(&self, force_https: bool) -> String {
        let scheme = if force_https { "https" } else { &self.scheme };
        let mut url = format!("{}://{}{}", scheme, self.host, self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn extracts_host_scheme_and_query() {
        let platform = PlatformConfig::default();
        let req = request(
            "/index.html?tenant_id=acme",
            &[("host", "acme.example.com:8080"), ("x-forwarded-proto", "https")],
        );
        let signals = RequestSignals::extract(&req, &platform);

        assert_eq!(signals.scheme, "https");
        assert_eq!(signals.host, "acme.example.com:8080");
        assert_eq!(signals.path, "/index.html");
        assert_eq!(signals.query, "tenant_id=acme");
        assert!(!signals.system_originated);
    }

    #[test]
    fn queue_and_cron_markers_flag_system_origin() {
        let platform = PlatformConfig::default();
        for marker in [&platform.queue_header, &platform.cron_header] {
            let req = request("/task", &[("host", "localhost"), (marker, "work")]);
            assert!(RequestSignals::extract(&req, &platform).system_originated);
        }
    }

    #[test]
    fn current_url_round_trips_and_forces_https() {
        let platform = PlatformConfig::default();
        let req = request("/a/b?x=1", &[("host", "acme.example.com")]);
        let signals = RequestSignals::extract(&req, &platform);

        assert_eq!(signals.current_url(false), "http://acme.example.com/a/b?x=1");
        assert_eq!(signals.current_url(true), "https://acme.example.com/a/b?x=1");
    }
}
