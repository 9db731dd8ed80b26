//! HTTP transport types shared by the dispatcher and its transports.
//!
//! # Design
//! Requests are plain data: the dispatcher builds an `HttpRequest` and hands
//! it to a `Transport`, which performs the actual I/O. Responses are exposed
//! through the `RawResponse` trait so a transport can defer reading the body
//! until one of the decode operations runs. `BufferedResponse` is the
//! in-memory implementation for transports (and tests) that already hold the
//! whole body.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{DecodeError, UnknownMethod};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute; `headers` already contains the settings' default
/// headers merged with any per-request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Status line and headers of a response, captured before the body is
/// decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl ResponseMetadata {
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::new(),
            url: url.into(),
            headers: Vec::new(),
        }
    }
}

/// A response handed back by a `Transport`.
///
/// Each decode operation consumes the response, so exactly one of them runs
/// per call. Any of them may fail independently of the status code.
#[async_trait]
pub trait RawResponse: Send + Sized {
    fn metadata(&self) -> ResponseMetadata;

    async fn json(self) -> Result<serde_json::Value, DecodeError>;

    async fn text(self) -> Result<String, DecodeError>;

    async fn blob(self) -> Result<Vec<u8>, DecodeError>;
}

/// A response whose body is already in memory.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub metadata: ResponseMetadata,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new(metadata: ResponseMetadata, body: impl Into<Vec<u8>>) -> Self {
        Self {
            metadata,
            body: body.into(),
        }
    }
}

#[async_trait]
impl RawResponse for BufferedResponse {
    fn metadata(&self) -> ResponseMetadata {
        self.metadata.clone()
    }

    async fn json(self) -> Result<serde_json::Value, DecodeError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    async fn text(self) -> Result<String, DecodeError> {
        Ok(String::from_utf8(self.body)?)
    }

    async fn blob(self) -> Result<Vec<u8>, DecodeError> {
        Ok(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> BufferedResponse {
        BufferedResponse::new(ResponseMetadata::new(status, "http://localhost:8888/x"), body)
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err, UnknownMethod("PATCH".to_string()));
    }

    #[tokio::test]
    async fn json_decodes_object() {
        let value = response(200, r#"{"id":"r1"}"#).json().await.unwrap();
        assert_eq!(value["id"], "r1");
    }

    #[tokio::test]
    async fn json_fails_on_empty_body() {
        let err = response(204, "").json().await.unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[tokio::test]
    async fn text_fails_on_invalid_utf8() {
        let resp = BufferedResponse::new(ResponseMetadata::new(200, "u"), vec![0xff, 0xfe]);
        let err = resp.text().await.unwrap_err();
        assert!(matches!(err, DecodeError::Utf8(_)));
    }

    #[tokio::test]
    async fn blob_returns_raw_bytes() {
        let bytes = response(200, "abc").blob().await.unwrap();
        assert_eq!(bytes, b"abc");
    }
}
