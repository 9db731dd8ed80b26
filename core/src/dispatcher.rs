//! The request dispatcher.
//!
//! # Design
//! `RequestDispatcher` holds a transport and a settings resolver and nothing
//! else, so concurrent calls share no mutable state. Every entry point
//! funnels into `dispatch`, which joins the URL, brackets the network call
//! with the optional progress handle, decodes the body as requested and hands
//! the result to `classify`. All failures come back as `Outcome::Failure`.

use tracing::{debug, error, info};

use crate::classify::{classify, Outcome};
use crate::error::DispatchError;
use crate::http::{HttpMethod, HttpRequest, RawResponse};
use crate::payload::FromPayload;
use crate::progress::{ProgressGuard, ProgressHandle};
use crate::request::RequestSpec;
use crate::settings::{join_url, SettingsResolver};
use crate::transport::Transport;

/// Stateless dispatcher for requests against one backend server.
#[derive(Debug, Clone)]
pub struct RequestDispatcher<X, S> {
    transport: X,
    settings: S,
}

impl<X, S> RequestDispatcher<X, S>
where
    X: Transport,
    S: SettingsResolver,
{
    pub fn new(transport: X, settings: S) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// GET `path`.
    pub async fn get<T: FromPayload>(
        &self,
        path: &str,
        progress: Option<&dyn ProgressHandle>,
    ) -> Outcome<T> {
        self.dispatch(path, RequestSpec::new(HttpMethod::Get), progress)
            .await
    }

    /// POST `body` to `path`.
    pub async fn post<T: FromPayload>(
        &self,
        path: &str,
        body: impl Into<Vec<u8>>,
        progress: Option<&dyn ProgressHandle>,
    ) -> Outcome<T> {
        let spec = RequestSpec::new(HttpMethod::Post).with_body(body);
        self.dispatch(path, spec, progress).await
    }

    /// PUT `body` to `path`.
    pub async fn put<T: FromPayload>(
        &self,
        path: &str,
        body: impl Into<Vec<u8>>,
        progress: Option<&dyn ProgressHandle>,
    ) -> Outcome<T> {
        let spec = RequestSpec::new(HttpMethod::Put).with_body(body);
        self.dispatch(path, spec, progress).await
    }

    /// DELETE `path`.
    pub async fn delete<T: FromPayload>(
        &self,
        path: &str,
        progress: Option<&dyn ProgressHandle>,
    ) -> Outcome<T> {
        self.dispatch(path, RequestSpec::new(HttpMethod::Delete), progress)
            .await
    }

    /// Send `spec` to `path` relative to the resolved base URL.
    ///
    /// `progress` is acquired before the request goes out and released as
    /// soon as a response (or a transport failure) comes back, before the
    /// body is decoded.
    pub async fn dispatch<T: FromPayload>(
        &self,
        path: &str,
        spec: RequestSpec,
        progress: Option<&dyn ProgressHandle>,
    ) -> Outcome<T> {
        let settings = self.settings.resolve();
        let url = join_url(&settings.base_url, path);
        let (method, body, extra_headers, decode_as) = spec.into_parts();
        let request = HttpRequest {
            method,
            url,
            headers: merge_headers(settings.default_headers, extra_headers),
            body,
        };

        info!(method = %request.method, url = %request.url, "sending request");

        let mut guard = ProgressGuard::acquire(progress);
        let result = self.transport.execute(request).await;
        guard.release();

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, path, "request failed without a response");
                return Outcome::Failure(DispatchError::Transport(err));
            }
        };

        let metadata = response.metadata();
        let status = metadata.status;
        debug!(status, path, "response received");

        let decoded = decode_as.decode(response).await;
        match classify(metadata, decoded, path) {
            Outcome::Success(payload) => match T::from_payload(payload) {
                Ok(value) => Outcome::Success(value),
                Err(source) => Outcome::Failure(DispatchError::Decode { status, source }),
            },
            Outcome::Empty => Outcome::Empty,
            Outcome::Failure(err) => {
                debug!(error = %err, path, "request settled as failure");
                Outcome::Failure(err)
            }
        }
    }
}

/// Per-request headers replace defaults of the same name (case-insensitive).
fn merge_headers(
    defaults: Vec<(String, String)>,
    extra: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .into_iter()
        .filter(|(name, _)| !extra.iter().any(|(other, _)| other.eq_ignore_ascii_case(name)))
        .collect();
    merged.extend(extra);
    merged
}
