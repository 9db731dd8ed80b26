//! Error types for the request dispatcher.
//!
//! # Design
//! Every server or network problem ends up in `DispatchError`, which callers
//! receive through `Outcome::Failure`. The variants follow the classification
//! rules: a transport fault, a server error with a decodable body, a 404/409
//! whose body could not be decoded, and any other decode failure.
//! `NotFoundOrConflict` carries the request path because the response body
//! gives no context.

use thiserror::Error;

use crate::http::ResponseMetadata;
use crate::payload::Payload;

/// Failure to decode a response body.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("expected a {expected} payload, got {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },
}

/// The request never reached the server or no response came back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {url} failed: {reason}")]
pub struct TransportError {
    pub url: String,
    pub reason: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// The failure half of an `Outcome`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-2xx status with a decodable body; the body is the server's error
    /// detail.
    #[error("server responded with status {status}")]
    Server { status: u16, body: Payload },

    #[error("{} {} for request path {request_path}", .response.status, .response.status_text)]
    NotFoundOrConflict {
        response: ResponseMetadata,
        request_path: String,
    },

    #[error("could not decode response with status {status}: {source}")]
    Decode {
        status: u16,
        #[source]
        source: DecodeError,
    },
}

impl DispatchError {
    /// Status code of the response, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Transport(_) => None,
            DispatchError::Server { status, .. } | DispatchError::Decode { status, .. } => {
                Some(*status)
            }
            DispatchError::NotFoundOrConflict { response, .. } => Some(response.status),
        }
    }

    /// Original request path, attached only to undecodable 404/409 responses.
    pub fn request_path(&self) -> Option<&str> {
        match self {
            DispatchError::NotFoundOrConflict { request_path, .. } => Some(request_path),
            _ => None,
        }
    }
}

/// A method name outside GET/POST/PUT/DELETE.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

/// Missing or invalid server settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("base URL must not be empty")]
    EmptyBaseUrl,
}
