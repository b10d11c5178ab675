//! Dispatch error taxonomy.
//!
//! Every tenant-facing error converts to an HTTP response at the dispatcher
//! boundary; nothing is retried internally. Tenant configuration problems
//! are Not-Found-class. Invalid tenant ids and unrecognized route shapes
//! indicate platform/configuration defects and surface as hard errors.

use axum::http::StatusCode;
use axum::response::Response;
use thiserror::Error;

use crate::dispatch::respond;
use crate::routes::table::ConfigDocError;
use crate::tenant::namespace::InvalidTenantId;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no {0} configuration file")]
    ConfigMissing(&'static str),

    #[error("configuration is missing or invalid: {0}")]
    ConfigMalformed(String),

    #[error("no handler for path {0}")]
    RouteNotFound(String),

    #[error("could not find script {0}")]
    ScriptNotFound(String),

    #[error(transparent)]
    InvalidTenantId(#[from] InvalidTenantId),

    #[error("unrecognized route shape: {0}")]
    UnrecognizedRouteShape(String),
}

impl From<ConfigDocError> for DispatchError {
    fn from(err: ConfigDocError) -> Self {
        match err {
            ConfigDocError::Malformed(reason) => DispatchError::ConfigMalformed(reason),
            ConfigDocError::UnrecognizedShape(reason) => {
                DispatchError::UnrecognizedRouteShape(reason)
            }
        }
    }
}

impl DispatchError {
    /// Convert into the tenant-facing HTTP response.
    pub fn into_response(self) -> Response {
        match &self {
            DispatchError::ConfigMissing(doc) => {
                respond::plain(StatusCode::NOT_FOUND, format!("Error: no {doc} file."))
            }
            DispatchError::ConfigMalformed(_) => {
                respond::plain(StatusCode::NOT_FOUND, format!("Error: {self}"))
            }
            DispatchError::RouteNotFound(path) => respond::not_found_page(path),
            DispatchError::ScriptNotFound(_) => {
                respond::plain(StatusCode::NOT_FOUND, format!("Error: {self}"))
            }
            DispatchError::InvalidTenantId(_) | DispatchError::UnrecognizedRouteShape(_) => {
                tracing::error!(error = %self, "Dispatch failed");
                respond::plain(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {self}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_config_problems_are_not_found_class() {
        for err in [
            DispatchError::ConfigMissing("app.yaml"),
            DispatchError::ConfigMalformed("bad yaml".into()),
            DispatchError::RouteNotFound("/x".into()),
            DispatchError::ScriptNotFound("main.app".into()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn platform_defects_are_internal_errors() {
        let err: DispatchError = crate::tenant::TenantId::new("a/b").unwrap_err().into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = DispatchError::UnrecognizedRouteShape("handler 0".into());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
