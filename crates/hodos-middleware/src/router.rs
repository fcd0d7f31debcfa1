//! The routing middleware.

use crate::dispatcher::MiddlewareDispatcher;
use crate::method_failure::MethodFailureResponder;
use hodos_core::{BoxFuture, HandlerResult, Middleware, Next, Request};
use hodos_router::{CurrentRoute, MatchingResult, UrlMatcher};
use hodos_telemetry::metrics::{record_route_match, RouteMatchOutcome};
use http::Method;
use std::sync::Arc;

/// Matches requests and runs the matched route's middleware.
///
/// On a match the [`CurrentRoute`] and the route [`Arguments`] are stored
/// in the request extensions, and the route's enabled middleware run with
/// the rest of the outer chain as their fallback. Requests that match no
/// path go straight to the next handler. Method failures are answered by a
/// [`MethodFailureResponder`] unless [`ignore_method_failure`] was called.
///
/// [`Arguments`]: hodos_router::Arguments
/// [`ignore_method_failure`]: Self::ignore_method_failure
pub struct Router {
    matcher: Arc<dyn UrlMatcher>,
    dispatcher: MiddlewareDispatcher,
    method_failure: Option<MethodFailureResponder>,
}

impl Router {
    /// Creates a router.
    pub fn new(matcher: impl UrlMatcher, dispatcher: MiddlewareDispatcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
            dispatcher,
            method_failure: Some(MethodFailureResponder::new()),
        }
    }

    /// Passes method failures to the next handler instead of answering them.
    #[must_use]
    pub fn ignore_method_failure(mut self) -> Self {
        self.method_failure = None;
        self
    }

    /// Returns `true` if method failures are answered by the router.
    #[must_use]
    pub fn handles_method_failure(&self) -> bool {
        self.method_failure.is_some()
    }

    async fn route(&self, mut request: Request, next: Next) -> HandlerResult {
        match self.matcher.match_request(&request) {
            MatchingResult::Success { route, arguments } => {
                let mut current = request
                    .extensions_mut()
                    .remove::<CurrentRoute>()
                    .unwrap_or_default();
                current.set_route_with_arguments(Arc::clone(&route), arguments.clone())?;
                current.set_uri(request.uri().clone())?;

                tracing::debug!(route = route.name(), path = request.uri().path(), "route matched");
                record_route_match(RouteMatchOutcome::Success);

                request.extensions_mut().insert(current);
                request.extensions_mut().insert(arguments);

                self.dispatcher
                    .with_middlewares(route.enabled_middlewares().iter().cloned())
                    .dispatch(request, next.into_handler())
                    .await
            }
            MatchingResult::Failure { allowed_methods } if !allowed_methods.is_empty() => {
                let Some(responder) = &self.method_failure else {
                    return next.run(request).await;
                };

                let outcome = if request.method() == Method::OPTIONS {
                    RouteMatchOutcome::Preflight
                } else {
                    RouteMatchOutcome::MethodNotAllowed
                };
                tracing::debug!(
                    method = %request.method(),
                    path = request.uri().path(),
                    outcome = outcome.as_str(),
                    "method not allowed"
                );
                record_route_match(outcome);
                responder.respond(&request, &allowed_methods)
            }
            MatchingResult::Failure { .. } => {
                tracing::trace!(path = request.uri().path(), "no route matched");
                record_route_match(RouteMatchOutcome::NotFound);
                next.run(request).await
            }
        }
    }
}

impl Middleware for Router {
    fn name(&self) -> &str {
        "router"
    }

    fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult> {
        Box::pin(self.route(request, next))
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("dispatcher", &self.dispatcher)
            .field("handles_method_failure", &self.handles_method_failure())
            .finish_non_exhaustive()
    }
}
