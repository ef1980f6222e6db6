//! Blocking HTTP transport.

use crate::constants;
use crate::error::Error;
use crate::logging;
use std::time::{Duration, Instant};

/// A fully resolved outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: constants::HTTP_METHOD_GET.to_string(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// `Content-Type` header, empty when absent
    pub content_type: String,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends one request and returns the whole response
pub trait Transport {
    /// # Errors
    /// Returns `Network` when the request cannot be sent or the body cannot be read.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, Error>;
}

/// Production transport backed by a blocking `reqwest` client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    max_body_len: usize,
}

/// Installs the process-wide rustls crypto provider; later calls are no-ops
pub fn install_crypto_provider() {
    #[cfg(not(windows))]
    let provider = rustls::crypto::ring::default_provider();
    #[cfg(windows)]
    let provider = rustls::crypto::aws_lc_rs::default_provider();
    let _ = provider.install_default();
}

impl HttpTransport {
    /// # Errors
    /// Returns `Network` when the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        install_crypto_provider();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_body_len: logging::get_max_body_len(),
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, Error> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Error::config(format!("invalid HTTP method '{}': {e}", request.method)))?;

        logging::log_request(
            &request.method,
            &request.url,
            &request.headers,
            request.body.as_deref(),
        );

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let start = Instant::now();
        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text()?;

        logging::log_response(
            status,
            start.elapsed().as_millis(),
            &headers,
            Some(&body),
            self.max_body_len,
        );

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let response = |status| ApiResponse {
            status,
            content_type: String::new(),
            body: String::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("https://example.com").header("Accept", "x");
        assert_eq!(request.method, "GET");
        assert_eq!(request.headers, vec![("Accept".to_string(), "x".to_string())]);
    }
}
