//! One-shot JSON fetch through a host transport.
//!
//! `fetch_json` is the framework-free form of a "fetch this uri and keep
//! data or error" hook: the caller holds the returned `FetchState` in
//! whatever state cell its UI uses.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::http::{HttpRequest, Transport};

/// Outcome of a fetch. At most one of `data` and `error` is set; both are
/// empty when nothing was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_idle(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    pub fn into_result(self) -> Option<Result<T, FetchError>> {
        match (self.data, self.error) {
            (_, Some(error)) => Some(Err(error)),
            (Some(data), None) => Some(Ok(data)),
            (None, None) => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for FetchState<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                data: None,
                error: Some(error),
            },
        }
    }
}

/// GET `uri` and decode the body as `T`. An empty `uri` issues no request.
pub fn fetch_json<T, X>(transport: &X, uri: &str) -> FetchState<T>
where
    T: DeserializeOwned,
    X: Transport + ?Sized,
{
    if uri.is_empty() {
        return FetchState::default();
    }
    debug!(uri, "fetching");
    fetch(transport, uri).into()
}

fn fetch<T, X>(transport: &X, uri: &str) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    X: Transport + ?Sized,
{
    let response = transport.execute(HttpRequest::get(uri.to_string()))?;
    if !response.is_success() {
        return Err(FetchError::Http {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| FetchError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;

    struct Fixed {
        reply: Result<HttpResponse, TransportError>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(reply: Result<HttpResponse, TransportError>) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for Fixed {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    #[test]
    fn empty_uri_is_idle() {
        let transport = Fixed::new(Ok(HttpResponse::new(200, "[]")));
        let state: FetchState<Vec<u32>> = fetch_json(&transport, "");
        assert!(state.is_idle());
        assert_eq!(transport.calls.get(), 0);
    }

    #[test]
    fn decodes_body() {
        let transport = Fixed::new(Ok(HttpResponse::new(200, "[1,2,3]")));
        let state: FetchState<Vec<u32>> = fetch_json(&transport, "http://x/numbers");
        assert_eq!(state.data, Some(vec![1, 2, 3]));
        assert!(state.error.is_none());
    }

    #[test]
    fn bad_json_sets_error() {
        let transport = Fixed::new(Ok(HttpResponse::new(200, "{")));
        let state: FetchState<Vec<u32>> = fetch_json(&transport, "http://x/numbers");
        assert!(state.data.is_none());
        assert!(matches!(state.error, Some(FetchError::Json(_))));
    }

    #[test]
    fn error_status_sets_error() {
        let transport = Fixed::new(Ok(HttpResponse::new(502, "bad gateway")));
        let state: FetchState<Vec<u32>> = fetch_json(&transport, "http://x/numbers");
        assert_eq!(
            state.into_result(),
            Some(Err(FetchError::Http {
                status: 502,
                body: "bad gateway".to_string()
            }))
        );
    }

    #[test]
    fn transport_failure_sets_error() {
        let transport = Fixed::new(Err(TransportError("offline".to_string())));
        let state: FetchState<Vec<u32>> = fetch_json(&transport, "http://x/numbers");
        assert!(matches!(state.error, Some(FetchError::Transport(_))));
    }
}
