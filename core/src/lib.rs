//! Uniform client-side request dispatcher for a single backend server.
//!
//! # Overview
//! `RequestDispatcher` issues GET/POST/PUT/DELETE requests against a base URL
//! supplied by a `SettingsResolver`, optionally shows a `ProgressHandle`
//! while the request is in flight, and settles every call as an `Outcome`:
//! a decoded payload, no content, or a `DispatchError`.
//!
//! # Design
//! - The network sits behind the `Transport` trait; `UreqTransport` is the
//!   bundled implementation and tests substitute scripted ones.
//! - Status-code handling lives in the pure `classify` function, so the
//!   status × decode matrix is testable without I/O.
//! - Bodies decode into an untyped `Payload` first; only successful payloads
//!   are converted into the caller's type through `FromPayload`.
//! - The dispatcher keeps no state between calls.

pub mod classify;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod payload;
pub mod progress;
pub mod request;
pub mod settings;
pub mod transport;

pub use classify::{classify, Outcome};
pub use dispatcher::RequestDispatcher;
pub use error::{ConfigError, DecodeError, DispatchError, TransportError, UnknownMethod};
pub use http::{BufferedResponse, HttpMethod, HttpRequest, RawResponse, ResponseMetadata};
pub use payload::{FromPayload, Json, Payload, Resource};
pub use progress::ProgressHandle;
pub use request::{DecodeAs, RequestSpec};
pub use settings::{join_url, ServerSettings, SettingsResolver};
pub use transport::{Transport, UreqTransport, UreqResponse};
