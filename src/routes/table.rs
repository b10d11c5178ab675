//! Parsing a tenant's declarative route configuration.
//!
//! # Responsibilities
//! - Parse the raw YAML document fetched from the tenant tree
//! - Build the ordered route table, one rule per declared handler
//! - Distinguish malformed documents (tenant error) from unrecognized
//!   handler shapes (structural defect)
//!
//! # Design Decisions
//! - Parsed structurally via `serde_yaml::Value`, not typed structs: the
//!   handler variant is discriminated by which keys are present
//! - Declaration order is preserved; ambiguity resolves to the first match

use serde_yaml::Value;
use thiserror::Error;

use crate::routes::rule::{parse_expiration, LoginRequirement, RouteRule, SecurityLevel};

/// Well-known path of the route-configuration document inside a tree.
pub const CONFIG_DOC_PATH: &str = "app.yaml";

/// Failure to turn a configuration document into a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigDocError {
    /// The document does not parse, or does not have the expected shape.
    /// Surfaced to the tenant as a Not-Found-class response.
    #[error("configuration is missing or invalid: {0}")]
    Malformed(String),

    /// A declared handler matches none of the known route shapes. This is
    /// a configuration/programming defect and must not be swallowed.
    #[error("unrecognized route shape: {0}")]
    UnrecognizedShape(String),
}

/// Ordered route table for one tenant, rebuilt from the document per request.
#[derive(Debug, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn parse(raw: &[u8]) -> Result<Self, ConfigDocError> {
        let doc: Value =
            serde_yaml::from_slice(raw).map_err(|e| ConfigDocError::Malformed(e.to_string()))?;
        if !doc.is_mapping() {
            return Err(ConfigDocError::Malformed(
                "document is not a mapping".to_string(),
            ));
        }

        let mut rules = Vec::new();
        if let Some(handlers) = doc.get("handlers") {
            let handlers = handlers.as_sequence().ok_or_else(|| {
                ConfigDocError::Malformed("handlers is not a sequence".to_string())
            })?;
            for (index, handler) in handlers.iter().enumerate() {
                rules.push(parse_handler(handler, index)?);
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

fn parse_handler(handler: &Value, index: usize) -> Result<RouteRule, ConfigDocError> {
    if !handler.is_mapping() {
        return Err(ConfigDocError::UnrecognizedShape(format!(
            "handler {index} is not a mapping"
        )));
    }

    let pattern = str_field(handler, "url").ok_or_else(|| {
        ConfigDocError::UnrecognizedShape(format!("handler {index} has no url"))
    })?;
    let secure = parse_secure(handler, &pattern)?;
    let login = parse_login(handler, &pattern)?;

    if let Some(file_path) = str_field(handler, "static_files") {
        let expiration_secs = match str_field(handler, "expiration") {
            Some(raw) => parse_expiration(&raw).ok_or_else(|| {
                ConfigDocError::Malformed(format!("invalid expiration {raw:?} for {pattern}"))
            })?,
            None => 0,
        };
        return Ok(RouteRule::Static {
            pattern,
            file_path,
            mime_type: str_field(handler, "mime_type"),
            expiration_secs,
            secure,
            login,
        });
    }

    if let Some(script_path) = str_field(handler, "script") {
        return Ok(RouteRule::Script {
            pattern,
            script_path,
            secure,
            login,
        });
    }

    Err(ConfigDocError::UnrecognizedShape(format!(
        "handler for {pattern} declares neither static_files nor script"
    )))
}

fn parse_secure(handler: &Value, pattern: &str) -> Result<SecurityLevel, ConfigDocError> {
    match str_field(handler, "secure").as_deref() {
        None | Some("default") | Some("optional") | Some("never") => Ok(SecurityLevel::Default),
        Some("always") => Ok(SecurityLevel::Always),
        Some(other) => Err(ConfigDocError::UnrecognizedShape(format!(
            "unknown secure value {other:?} for {pattern}"
        ))),
    }
}

fn parse_login(handler: &Value, pattern: &str) -> Result<LoginRequirement, ConfigDocError> {
    match str_field(handler, "login").as_deref() {
        None | Some("none") | Some("optional") => Ok(LoginRequirement::None),
        Some("required") => Ok(LoginRequirement::Required),
        Some("admin") => Ok(LoginRequirement::Admin),
        Some(other) => Err(ConfigDocError::UnrecognizedShape(format!(
            "unknown login value {other:?} for {pattern}"
        ))),
    }
}

fn str_field(handler: &Value, key: &str) -> Option<String> {
    handler.get(key)?.as_str().map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_handlers_in_declaration_order() {
        let doc = b"
application: demo
handlers:
- url: /static/*
  static_files: static/
  expiration: 10m
  mime_type: text/css
- url: /*
  script: main.app
  login: admin
  secure: always
";
        let table = RouteTable::parse(doc).unwrap();
        assert_eq!(table.rules().len(), 2);
        assert!(matches!(
            &table.rules()[0],
            RouteRule::Static { expiration_secs: 600, mime_type: Some(m), .. } if m == "text/css"
        ));
        assert!(matches!(
            &table.rules()[1],
            RouteRule::Script { login: LoginRequirement::Admin, secure: SecurityLevel::Always, .. }
        ));
    }

    #[test]
    fn non_mapping_document_is_malformed() {
        assert!(matches!(
            RouteTable::parse(b"- just\n- a\n- list\n"),
            Err(ConfigDocError::Malformed(_))
        ));
        assert!(matches!(
            RouteTable::parse(b": {not yaml"),
            Err(ConfigDocError::Malformed(_))
        ));
    }

    #[test]
    fn missing_handlers_key_is_an_empty_table() {
        let table = RouteTable::parse(b"application: demo\n").unwrap();
        assert!(table.rules().is_empty());
    }

    #[test]
    fn handler_without_target_is_unrecognized() {
        let doc = b"
handlers:
- url: /broken
  login: required
";
        assert!(matches!(
            RouteTable::parse(doc),
            Err(ConfigDocError::UnrecognizedShape(_))
        ));
    }

    #[test]
    fn unknown_login_value_is_unrecognized() {
        let doc = b"
handlers:
- url: /x
  script: main.app
  login: superuser
";
        assert!(matches!(
            RouteTable::parse(doc),
            Err(ConfigDocError::UnrecognizedShape(_))
        ));
    }

    #[test]
    fn bad_expiration_is_malformed() {
        let doc = b"
handlers:
- url: /x
  static_files: x.html
  expiration: soon
";
        assert!(matches!(
            RouteTable::parse(doc),
            Err(ConfigDocError::Malformed(_))
        ));
    }
}
