//! Responses for requests whose path matched but whose method did not.

use hodos_core::{HodosError, HodosResult, Request, Response, ResponseExt};
use http::{Method, StatusCode};

/// Answers method failures with the methods the path accepts.
///
/// `OPTIONS` requests get `204 No Content`, everything else
/// `405 Method Not Allowed`. Both carry an `Allow` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodFailureResponder;

impl MethodFailureResponder {
    /// Creates a responder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the response for `request`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyAllowedMethods` if `allowed` is empty.
    pub fn respond(&self, request: &Request, allowed: &[Method]) -> HodosResult<Response> {
        if allowed.is_empty() {
            return Err(HodosError::EmptyAllowedMethods);
        }

        let status = if request.method() == Method::OPTIONS {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::METHOD_NOT_ALLOWED
        };
        Ok(Response::allow(status, allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::header::ALLOW;
    use http_body_util::Full;

    fn request(method: Method) -> Request {
        http::Request::builder()
            .method(method)
            .uri("/users")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_not_allowed() {
        let response = MethodFailureResponder::new()
            .respond(&request(Method::DELETE), &[Method::GET, Method::HEAD])
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_options_gets_no_content() {
        let response = MethodFailureResponder::new()
            .respond(&request(Method::OPTIONS), &[Method::GET, Method::HEAD])
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_empty_allowed_methods() {
        let err = MethodFailureResponder::new()
            .respond(&request(Method::GET), &[])
            .unwrap_err();
        assert!(matches!(err, HodosError::EmptyAllowedMethods));
    }
}
