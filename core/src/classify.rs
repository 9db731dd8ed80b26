//! Response classification.
//!
//! # Design
//! `classify` is a pure function of the response metadata, the decode result
//! and the request path, so every cell of the status × decode matrix can be
//! tested without I/O. Status takes precedence over the decode result: 405 is
//! always `Empty`. 204/404/409 are special only when the body fails to
//! decode; a 404 or 409 with a decodable body is reported like any other
//! server error.

use crate::error::{DecodeError, DispatchError};
use crate::http::ResponseMetadata;
use crate::payload::Payload;

/// Result of one dispatch. Exactly one variant is produced per call.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    Success(T),
    /// No content. Carries no payload.
    Empty,
    Failure(DispatchError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&DispatchError> {
        match self {
            Outcome::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Empty => Outcome::Empty,
            Outcome::Failure(err) => Outcome::Failure(err),
        }
    }

    /// `Empty` becomes `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, DispatchError> {
        match self {
            Outcome::Success(value) => Ok(Some(value)),
            Outcome::Empty => Ok(None),
            Outcome::Failure(err) => Err(err),
        }
    }
}

/// Map a response and its decoded body onto an `Outcome`.
pub fn classify(
    response: ResponseMetadata,
    decoded: Result<Payload, DecodeError>,
    request_path: &str,
) -> Outcome<Payload> {
    match (response.status, decoded) {
        (405, _) => Outcome::Empty,
        (200..=299, Ok(payload)) => Outcome::Success(payload),
        (status, Ok(body)) => Outcome::Failure(DispatchError::Server { status, body }),
        (404 | 409, Err(_)) => Outcome::Failure(DispatchError::NotFoundOrConflict {
            response,
            request_path: request_path.to_string(),
        }),
        (204, Err(_)) => Outcome::Empty,
        (status, Err(source)) => Outcome::Failure(DispatchError::Decode { status, source }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta(status: u16) -> ResponseMetadata {
        ResponseMetadata::new(status, "http://localhost:8888/api/runtimes")
    }

    fn decoded() -> Result<Payload, DecodeError> {
        Ok(Payload::Json(json!({"id": "r1"})))
    }

    fn undecodable() -> Result<Payload, DecodeError> {
        Err(serde_json::from_str::<serde_json::Value>("").unwrap_err().into())
    }

    #[test]
    fn success_range_with_body_is_success() {
        for status in [200, 201, 202, 204, 299] {
            let outcome = classify(meta(status), decoded(), "/runtimes");
            assert_eq!(outcome.success(), Some(Payload::Json(json!({"id": "r1"}))), "{status}");
        }
    }

    #[test]
    fn method_not_allowed_is_always_empty() {
        assert!(classify(meta(405), decoded(), "/jobs").is_empty());
        assert!(classify(meta(405), undecodable(), "/jobs").is_empty());
    }

    #[test]
    fn no_content_without_body_is_empty() {
        assert!(classify(meta(204), undecodable(), "/runtimes/r1").is_empty());
    }

    #[test]
    fn not_found_and_conflict_carry_request_path() {
        for status in [404, 409] {
            let outcome = classify(meta(status), undecodable(), "/runtimes/missing");
            match outcome {
                Outcome::Failure(DispatchError::NotFoundOrConflict { response, request_path }) => {
                    assert_eq!(response.status, status);
                    assert_eq!(request_path, "/runtimes/missing");
                }
                other => panic!("unexpected outcome for {status}: {other:?}"),
            }
        }
    }

    #[test]
    fn decodable_error_body_is_returned_verbatim() {
        let body = json!({"reason": "Internal Server Error", "message": "boom"});
        let outcome = classify(meta(500), Ok(Payload::Json(body.clone())), "/failing");
        match outcome {
            Outcome::Failure(DispatchError::Server { status, body: got }) => {
                assert_eq!(status, 500);
                assert_eq!(got, Payload::Json(body));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn decodable_not_found_body_is_a_server_error() {
        let outcome = classify(meta(404), decoded(), "/runtimes/missing");
        assert!(matches!(
            outcome,
            Outcome::Failure(DispatchError::Server { status: 404, .. })
        ));
    }

    #[test]
    fn other_undecodable_statuses_report_the_decode_error() {
        for status in [200, 302, 400, 500] {
            let outcome = classify(meta(status), undecodable(), "/runtimes");
            match outcome {
                Outcome::Failure(DispatchError::Decode { status: got, source }) => {
                    assert_eq!(got, status);
                    assert!(matches!(source, DecodeError::Json(_)));
                }
                other => panic!("unexpected outcome for {status}: {other:?}"),
            }
        }
    }

    #[test]
    fn informational_status_with_body_is_failure() {
        assert!(classify(meta(101), decoded(), "/runtimes").is_failure());
    }

    #[test]
    fn into_result_maps_empty_to_none() {
        let outcome: Outcome<u8> = Outcome::Empty;
        assert!(matches!(outcome.into_result(), Ok(None)));
        assert_eq!(Outcome::Success(2).map(|v| v * 2).into_result().unwrap(), Some(4));
    }
}
