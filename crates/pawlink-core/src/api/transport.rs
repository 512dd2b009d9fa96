//! HTTP transport seam.
//!
//! The request pipeline talks to the network through the [`HttpTransport`]
//! trait, so the refresh-and-replay logic can be driven against a scripted
//! transport in tests. [`ReqwestTransport`] is the production implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header;
use thiserror::Error;
use url::Url;

use super::endpoint::Method;

/// One wire request, fully assembled.
///
/// The body is raw bytes so the exact same request can be sent a second time
/// after a token refresh without re-encoding anything.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Vec<u8>>,
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP layer. A response carrying an error status is not
/// a transport error; it comes back as a normal [`TransportResponse`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("connection closed before a response arrived")]
    NoResponse,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

// ===== Production transport =====

/// Transport backed by a shared `reqwest` client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.clone());
        if let Some(ref token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref content_type) = request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        // A failure while draining the body means the exchange died before a
        // complete response arrived.
        let body = response
            .bytes()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::NoResponse
                }
            })?
            .to_vec();

        Ok(TransportResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_covers_the_2xx_range() {
        let ok = TransportResponse {
            status: 204,
            body: Vec::new(),
        };
        let redirect = TransportResponse {
            status: 301,
            body: Vec::new(),
        };
        let client_error = TransportResponse {
            status: 401,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!client_error.is_success());
    }
}
