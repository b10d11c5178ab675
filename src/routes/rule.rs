//! Route rules and their field semantics.

/// Transport requirement declared on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    /// Serve over whatever scheme the request arrived on.
    Default,
    /// Redirect to https in production deployments.
    Always,
}

/// Authorization requirement declared on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRequirement {
    None,
    Required,
    Admin,
}

/// One entry of a tenant's route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRule {
    Static {
        pattern: String,
        file_path: String,
        /// Content-Type override; absent means guess from the extension.
        mime_type: Option<String>,
        /// Cache lifetime in seconds; zero means no caching headers.
        expiration_secs: u64,
        secure: SecurityLevel,
        login: LoginRequirement,
    },
    Script {
        pattern: String,
        script_path: String,
        secure: SecurityLevel,
        login: LoginRequirement,
    },
}

impl RouteRule {
    pub fn pattern(&self) -> &str {
        match self {
            RouteRule::Static { pattern, .. } | RouteRule::Script { pattern, .. } => pattern,
        }
    }

    pub fn secure(&self) -> SecurityLevel {
        match self {
            RouteRule::Static { secure, .. } | RouteRule::Script { secure, .. } => *secure,
        }
    }

    pub fn login(&self) -> LoginRequirement {
        match self {
            RouteRule::Static { login, .. } | RouteRule::Script { login, .. } => *login,
        }
    }

    /// Whether this rule's pattern matches a concrete request path.
    pub fn matches(&self, path: &str) -> bool {
        pattern_matches(self.pattern(), path)
    }
}

/// Pattern semantics: exact string equality, except a single trailing `*`
/// turns the remainder into a literal prefix. No other wildcards.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == pattern,
    }
}

/// Parse a cache expiration declaration such as `"1d 6h"` into seconds.
///
/// Terms are whitespace-separated `<n><unit>` with units d/h/m/s.
pub fn parse_expiration(raw: &str) -> Option<u64> {
    let mut total: u64 = 0;
    for term in raw.split_whitespace() {
        if term.len() < 2 || !term.is_ascii() {
            return None;
        }
        let (amount, unit) = term.split_at(term.len() - 1);
        let amount: u64 = amount.parse().ok()?;
        let factor = match unit {
            "d" => 24 * 60 * 60,
            "h" => 60 * 60,
            "m" => 60,
            "s" => 1,
            _ => return None,
        };
        total = total.checked_add(amount.checked_mul(factor)?)?;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_patterns_require_equality() {
        assert!(pattern_matches("/index.html", "/index.html"));
        assert!(!pattern_matches("/index.html", "/index.html.bak"));
        assert!(!pattern_matches("/index.html", "/index"));
    }

    #[test]
    fn trailing_star_is_a_prefix() {
        assert!(pattern_matches("/static/*", "/static/css/site.css"));
        assert!(pattern_matches("/x*", "/xyz"));
        assert!(pattern_matches("/*", "/anything"));
        assert!(!pattern_matches("/static/*", "/other/file"));
    }

    #[test]
    fn expiration_terms_accumulate() {
        assert_eq!(parse_expiration("10m"), Some(600));
        assert_eq!(parse_expiration("1d 6h"), Some(108_000));
        assert_eq!(parse_expiration(""), Some(0));
    }

    #[test]
    fn expiration_rejects_garbage() {
        assert_eq!(parse_expiration("10x"), None);
        assert_eq!(parse_expiration("m"), None);
        assert_eq!(parse_expiration("ten minutes"), None);
    }
}
