//! Transport abstraction for proxy requests.
//!
//! The client only needs "GET this endpoint, give me status and body".
//! [`HttpTransport`] does that over HTTP(S); tests substitute an in-memory
//! proxy.

use std::sync::Arc;

use bytes::Bytes;
use discovery_core::Interrupted;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ProxyError, Result};

/// A raw proxy response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }
}

/// Something that can fetch proxy endpoints.
///
/// `endpoint` is relative to the proxy root, already escaped
/// (e.g. `github.com/!azure/go/@v/list`). Implementations report
/// connection failures as errors and leave status handling to the client.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &str) -> Result<Response>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, endpoint: &str) -> Result<Response> {
        (**self).get(endpoint).await
    }
}

/// HTTP(S) transport bound to one proxy base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from client settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder.build().map_err(|e| ProxyError::Config {
            detail: format!("building HTTP client: {e}"),
        })?;
        Ok(HttpTransport {
            client,
            base_url: config.base_url().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "proxy request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(endpoint, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(endpoint, e))?;

        debug!(%url, status, bytes = body.len(), "proxy response");
        Ok(Response { status, body })
    }
}

fn request_error(endpoint: &str, err: reqwest::Error) -> ProxyError {
    if err.is_timeout() {
        ProxyError::Interrupted(Interrupted::DeadlineExceeded)
    } else {
        ProxyError::transport(endpoint, err.to_string())
    }
}
