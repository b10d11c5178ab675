//! Request classification.
//!
//! Classification happens before any tenant or authorization logic and
//! depends only on the request path: the control and shell prefixes are
//! checked literally, anything else is a target-application request.

use crate::config::PlatformConfig;

/// Mutually exclusive request classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    Control,
    ShellSession,
    TargetApp,
}

impl RequestClass {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestClass::Control => "control",
            RequestClass::ShellSession => "shell",
            RequestClass::TargetApp => "target",
        }
    }
}

pub fn classify(path: &str, platform: &PlatformConfig) -> RequestClass {
    if path.starts_with(&platform.control_prefix) {
        RequestClass::Control
    } else if path.starts_with(&platform.shell_prefix) {
        RequestClass::ShellSession
    } else {
        RequestClass::TargetApp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_partition_request_classes() {
        let platform = PlatformConfig::default();
        assert_eq!(classify("/_control/status", &platform), RequestClass::Control);
        assert_eq!(classify("/_shell/session", &platform), RequestClass::ShellSession);
        assert_eq!(classify("/", &platform), RequestClass::TargetApp);
        assert_eq!(classify("/index.html", &platform), RequestClass::TargetApp);
        // prefix check is literal, not segment-aware
        assert_eq!(classify("/_controlled", &platform), RequestClass::Control);
    }
}
