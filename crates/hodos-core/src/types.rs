//! HTTP message types used throughout Hodos.

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;

/// The HTTP request type routed and dispatched by Hodos.
///
/// This is a standard `http::Request` with a `Full<Bytes>` body. Routing
/// state such as the current route travels in the request extensions.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by handlers and middleware.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building simple responses.
pub trait ResponseExt {
    /// Creates a response with the given status and an empty body.
    fn empty(status: StatusCode) -> Response;

    /// Creates a plain text response.
    fn text(status: StatusCode, body: impl Into<String>) -> Response;

    /// Creates an empty response carrying an `Allow` header listing `methods`.
    fn allow(status: StatusCode, methods: &[Method]) -> Response;
}

impl ResponseExt for Response {
    fn empty(status: StatusCode) -> Response {
        http::Response::builder()
            .status(status)
            .body(Full::new(Bytes::new()))
            .expect("failed to build empty response")
    }

    fn text(status: StatusCode, body: impl Into<String>) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(body.into())))
            .expect("failed to build text response")
    }

    fn allow(status: StatusCode, methods: &[Method]) -> Response {
        let allow = methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        http::Response::builder()
            .status(status)
            .header(http::header::ALLOW, allow)
            .body(Full::new(Bytes::new()))
            .expect("failed to build allow response")
    }
}
