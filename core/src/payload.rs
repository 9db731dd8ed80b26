//! Decoded response bodies and their conversion into caller types.
//!
//! # Design
//! A body is first decoded into an untyped `Payload` (the variant matches the
//! decode operation that produced it). Classification works on `Payload` so
//! server error bodies can be reported verbatim whatever the caller expected.
//! Only a successful payload is converted into the caller's `T` through
//! `FromPayload`.

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Opaque server resource: the payload type to use when the caller has no
/// schema of its own.
pub type Resource = serde_json::Value;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Blob(Vec<u8>),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Json(_) => "json",
            Payload::Text(_) => "text",
            Payload::Blob(_) => "blob",
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &'static str) -> DecodeError {
        DecodeError::UnexpectedKind {
            expected,
            found: self.kind(),
        }
    }
}

/// Conversion from a decoded payload into the type a caller asked for.
pub trait FromPayload: Sized {
    fn from_payload(payload: Payload) -> Result<Self, DecodeError>;
}

impl FromPayload for Payload {
    fn from_payload(payload: Payload) -> Result<Self, DecodeError> {
        Ok(payload)
    }
}

impl FromPayload for serde_json::Value {
    fn from_payload(payload: Payload) -> Result<Self, DecodeError> {
        match payload {
            Payload::Json(value) => Ok(value),
            Payload::Text(text) => Ok(serde_json::Value::String(text)),
            other => Err(other.mismatch("json")),
        }
    }
}

impl FromPayload for String {
    fn from_payload(payload: Payload) -> Result<Self, DecodeError> {
        match payload {
            Payload::Text(text) => Ok(text),
            Payload::Json(serde_json::Value::String(text)) => Ok(text),
            other => Err(other.mismatch("text")),
        }
    }
}

impl FromPayload for Vec<u8> {
    fn from_payload(payload: Payload) -> Result<Self, DecodeError> {
        match payload {
            Payload::Blob(bytes) => Ok(bytes),
            Payload::Text(text) => Ok(text.into_bytes()),
            other => Err(other.mismatch("blob")),
        }
    }
}

impl FromPayload for () {
    fn from_payload(_: Payload) -> Result<Self, DecodeError> {
        Ok(())
    }
}

/// A JSON body deserialized into `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> FromPayload for Json<T> {
    fn from_payload(payload: Payload) -> Result<Self, DecodeError> {
        let value = match payload {
            Payload::Json(value) => serde_json::from_value(value)?,
            Payload::Text(text) => serde_json::from_str(&text)?,
            Payload::Blob(bytes) => serde_json::from_slice(&bytes)?,
        };
        Ok(Json(value))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Runtime {
        id: String,
    }

    #[test]
    fn value_accepts_json_and_text() {
        let value = Resource::from_payload(Payload::Json(json!({"id": "r1"}))).unwrap();
        assert_eq!(value, json!({"id": "r1"}));

        let value = Resource::from_payload(Payload::Text("plain".to_string())).unwrap();
        assert_eq!(value, json!("plain"));
    }

    #[test]
    fn value_rejects_blob() {
        let err = Resource::from_payload(Payload::Blob(vec![1, 2])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedKind {
                expected: "json",
                found: "blob"
            }
        ));
    }

    #[test]
    fn json_wrapper_deserializes_typed_resource() {
        let Json(runtime) =
            Json::<Runtime>::from_payload(Payload::Json(json!({"id": "r1"}))).unwrap();
        assert_eq!(runtime, Runtime { id: "r1".to_string() });
    }

    #[test]
    fn json_wrapper_reports_schema_mismatch() {
        let err = Json::<Runtime>::from_payload(Payload::Json(json!({"name": "x"}))).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn string_rejects_json_object() {
        let err = String::from_payload(Payload::Json(json!({}))).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedKind { expected: "text", .. }));
    }

    #[test]
    fn unit_discards_anything() {
        assert!(<()>::from_payload(Payload::Blob(vec![0])).is_ok());
    }
}
