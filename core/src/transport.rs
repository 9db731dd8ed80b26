//! Network transport seam and the default ureq-backed implementation.
//!
//! # Design
//! `Transport` is the only place the dispatcher touches the network. The
//! bundled `UreqTransport` turns off ureq's status-as-error behavior so 4xx
//! and 5xx responses come back as data for the classifier. ureq is blocking,
//! so each call and each body read runs on tokio's blocking pool. The body is
//! read only when a decode operation asks for it.

use async_trait::async_trait;

use crate::error::{DecodeError, TransportError};
use crate::http::{HttpMethod, HttpRequest, RawResponse, ResponseMetadata};

/// Performs one HTTP round-trip.
///
/// A returned `Err` means no response arrived; every status code, including
/// errors, is an `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: RawResponse;

    async fn execute(&self, request: HttpRequest) -> Result<Self::Response, TransportError>;
}

/// Transport backed by a `ureq::Agent`.
///
/// Response bodies are read without a size limit unless one is set with
/// `with_body_limit`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Cap the number of body bytes a decode operation will read. A larger
    /// body fails with `DecodeError::Body`.
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    type Response = UreqResponse;

    async fn execute(&self, request: HttpRequest) -> Result<UreqResponse, TransportError> {
        let agent = self.agent.clone();
        let body_limit = self.body_limit;
        let url = request.url.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request, body_limit))
            .await
            .map_err(|err| TransportError::new(url, err.to_string()))?
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute_blocking(
    agent: &ureq::Agent,
    request: HttpRequest,
    body_limit: u64,
) -> Result<UreqResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match (method, body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&url), &headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&url), &headers).call(),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(&url), &headers).send(&body[..]),
        (HttpMethod::Post, None) => with_headers(agent.post(&url), &headers).send_empty(),
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(&url), &headers).send(&body[..]),
        (HttpMethod::Put, None) => with_headers(agent.put(&url), &headers).send_empty(),
    };
    let response = result.map_err(|err| TransportError::new(&url, err.to_string()))?;

    let status = response.status();
    let metadata = ResponseMetadata {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        url,
        headers: response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
    };

    Ok(UreqResponse {
        metadata,
        body: response.into_body(),
        body_limit,
    })
}

/// A ureq response whose body has not been read yet.
pub struct UreqResponse {
    metadata: ResponseMetadata,
    body: ureq::Body,
    body_limit: u64,
}

impl std::fmt::Debug for UreqResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqResponse")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl UreqResponse {
    async fn read_body(self) -> Result<Vec<u8>, DecodeError> {
        let mut body = self.body;
        let limit = self.body_limit;
        tokio::task::spawn_blocking(move || body.with_config().limit(limit).read_to_vec())
            .await
            .map_err(|err| DecodeError::Body(err.to_string()))?
            .map_err(|err| DecodeError::Body(err.to_string()))
    }
}

#[async_trait]
impl RawResponse for UreqResponse {
    fn metadata(&self) -> ResponseMetadata {
        self.metadata.clone()
    }

    async fn json(self) -> Result<serde_json::Value, DecodeError> {
        let bytes = self.read_body().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn text(self) -> Result<String, DecodeError> {
        let bytes = self.read_body().await?;
        Ok(String::from_utf8(bytes)?)
    }

    async fn blob(self) -> Result<Vec<u8>, DecodeError> {
        self.read_body().await
    }
}
