//! Per-call request description.

use crate::error::DecodeError;
use crate::http::{HttpMethod, RawResponse};
use crate::payload::Payload;

/// Which decode operation to run on the response body.
///
/// Always chosen by the caller, never inferred from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeAs {
    #[default]
    Json,
    Text,
    Blob,
}

impl DecodeAs {
    pub(crate) async fn decode<R: RawResponse>(self, response: R) -> Result<Payload, DecodeError> {
        match self {
            DecodeAs::Json => response.json().await.map(Payload::Json),
            DecodeAs::Text => response.text().await.map(Payload::Text),
            DecodeAs::Blob => response.blob().await.map(Payload::Blob),
        }
    }
}

/// Method, body, extra headers and decode mode for one dispatch.
///
/// The method is required at construction, so a spec without one cannot
/// exist. Builder methods consume the spec; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    method: HttpMethod,
    body: Option<Vec<u8>>,
    headers: Vec<(String, String)>,
    decode_as: DecodeAs,
}

impl RequestSpec {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
            decode_as: DecodeAs::default(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a header sent on top of the settings' defaults. A per-request
    /// header replaces a default header with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn decode_as(mut self, decode_as: DecodeAs) -> Self {
        self.decode_as = decode_as;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn decoding(&self) -> DecodeAs {
        self.decode_as
    }

    pub(crate) fn into_parts(self) -> (HttpMethod, Option<Vec<u8>>, Vec<(String, String)>, DecodeAs) {
        (self.method, self.body, self.headers, self.decode_as)
    }
}
