//! Request and response logging with automatic secret redaction.
//!
//! Requests are logged at info level, headers at debug level and bodies at
//! trace level. Credential-bearing headers are always redacted.

use crate::constants;
use tracing::{debug, info, trace};

const REDACTED: &str = "[REDACTED]";

/// Checks if a header name should be redacted
#[must_use]
pub fn should_redact_header(header_name: &str) -> bool {
    let lower = header_name.to_lowercase();
    matches!(
        lower.as_str(),
        "authorization"
            | "proxy-authorization"
            | "cookie"
            | "set-cookie"
            | "x-api-key"
            | "x-auth-token"
            | "token"
    )
}

fn log_headers(direction: &str, headers: &[(String, String)]) {
    if headers.is_empty() {
        return;
    }

    debug!(target: "scalr::transport", "{direction} headers:");
    for (name, value) in headers {
        let display_value = if should_redact_header(name) {
            REDACTED
        } else {
            value.as_str()
        };
        debug!(target: "scalr::transport", "  {name}: {display_value}");
    }
}

/// Logs an outbound HTTP request
pub fn log_request(method: &str, url: &str, headers: &[(String, String)], body: Option<&str>) {
    info!(target: "scalr::transport", "→ {} {}", method.to_uppercase(), url);

    log_headers("Request", headers);

    if let Some(body_content) = body {
        trace!(target: "scalr::transport", "Request body: {body_content}");
    }
}

/// Logs an HTTP response
pub fn log_response(
    status: u16,
    duration_ms: u128,
    headers: &[(String, String)],
    body: Option<&str>,
    max_body_len: usize,
) {
    info!(target: "scalr::transport", "← {status} ({duration_ms}ms)");

    log_headers("Response", headers);

    let Some(body_content) = body else {
        return;
    };

    match body_content.char_indices().nth(max_body_len) {
        Some((cut, _)) => trace!(
            target: "scalr::transport",
            "Response body: {} (truncated at {} chars)",
            &body_content[..cut],
            max_body_len
        ),
        None => trace!(target: "scalr::transport", "Response body: {body_content}"),
    }
}

/// Gets the maximum logged body length from `SCALR_LOG_MAX_BODY`
#[must_use]
pub fn get_max_body_len() -> usize {
    std::env::var(constants::ENV_LOG_MAX_BODY)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(constants::DEFAULT_LOG_MAX_BODY)
}
