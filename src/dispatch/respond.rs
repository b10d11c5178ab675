//! Response constructors for dispatch outcomes.

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};

/// HTML page for paths no route rule matches.
const NOT_FOUND_PAGE: &str = "\
<html>
  <body>
    <h3>404 Not Found</h3>
    Your application's <code>app.yaml</code> file does not have a handler for
    the requested path: <code>{path}</code>
  </body>
</html>
";

pub fn plain(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message.into(),
    )
        .into_response()
}

pub fn html(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

/// The human-readable 404 page naming the unmatched path.
pub fn not_found_page(path: &str) -> Response {
    html(
        StatusCode::NOT_FOUND,
        NOT_FOUND_PAGE.replace("{path}", &escape(path)),
    )
}

/// 302 to `location`.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(_) => plain(StatusCode::BAD_REQUEST, "redirect target is not a valid URL"),
    }
}

/// 200 with the file contents, content type and cache policy.
pub fn static_file(data: Bytes, content_type: &str, expiration_secs: u64) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        data,
    )
        .into_response();

    if expiration_secs > 0 {
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={expiration_secs}")) {
            headers.insert(header::CACHE_CONTROL, value);
        }
        // expirations beyond the representable date range get no Expires
        // header; Cache-Control already carries the policy
        let expires = i64::try_from(expiration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        if let Some(expires) = expires {
            let formatted = expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
            if let Ok(value) = HeaderValue::from_str(&formatted) {
                headers.insert(header::EXPIRES, value);
            }
        }
    }
    response
}

/// 403 for anonymous callers: point at the login URL.
pub fn forbidden_anonymous(login_url: &str) -> Response {
    html(
        StatusCode::FORBIDDEN,
        format!(
            "You are not authorized to view this page. \
             You may need to <a href=\"{login_url}\">login</a>."
        ),
    )
}

/// 403 for authenticated-but-unauthorized callers: name them and point at
/// the logout URL so they can switch accounts.
pub fn forbidden_user(name: &str, logout_url: &str) -> Response {
    html(
        StatusCode::FORBIDDEN,
        format!(
            "User <b>{}</b> is not authorized to view this page.<br>\
             Please <a href=\"{logout_url}\">logout</a> and then login as an \
             authorized user.",
            escape(name)
        ),
    )
}

/// Content type guessed from the file extension.
///
/// A deliberately small map; rules that need anything richer declare an
/// explicit `mime_type` override.
pub fn guess_mime(file_path: &str) -> &'static str {
    let extension = file_path.rsplit('.').next().unwrap_or_default();
    match extension {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" | "yaml" | "yml" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_file_sets_cache_headers_only_when_expiring() {
        let response = static_file(Bytes::from_static(b"body"), "text/css", 600);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=600"
        );
        assert!(response.headers().contains_key(header::EXPIRES));

        let response = static_file(Bytes::from_static(b"body"), "text/css", 0);
        assert!(!response.headers().contains_key(header::CACHE_CONTROL));
        assert!(!response.headers().contains_key(header::EXPIRES));
    }

    #[test]
    fn absurd_expirations_do_not_panic() {
        for secs in [99_999_999_999_999_999_u64, u64::MAX] {
            let response = static_file(Bytes::from_static(b"body"), "text/css", secs);
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().contains_key(header::CACHE_CONTROL));
            assert!(!response.headers().contains_key(header::EXPIRES));
        }
    }

    #[test]
    fn mime_guesses() {
        assert_eq!(guess_mime("static/site.css"), "text/css");
        assert_eq!(guess_mime("index.html"), "text/html");
        assert_eq!(guess_mime("blob"), "application/octet-stream");
    }

    #[test]
    fn not_found_page_names_the_path() {
        let response = not_found_page("/missing<script>");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
