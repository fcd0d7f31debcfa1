//! Builds and caches the middleware stack for a definition list.

use crate::factory::MiddlewareFactory;
use crate::stack::MiddlewareStack;
use hodos_core::{HandlerResult, MiddlewareDefinition, Request, RequestHandler};
use std::sync::{Arc, OnceLock};

/// Dispatches requests through a list of middleware definitions.
///
/// The stack is built on the first [`dispatch`](Self::dispatch) and reused
/// afterwards, bound to the fallback handler of that first call.
/// [`with_middlewares`](Self::with_middlewares) returns a dispatcher with a
/// fresh cache.
///
/// # Example
///
/// ```
/// use hodos_core::{FnHandler, FnMiddleware, HodosResult, MiddlewareDefinition, Next, Request, Response, ResponseExt};
/// use hodos_middleware::{MiddlewareDispatcher, MiddlewareFactory};
/// use http::StatusCode;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let dispatcher = MiddlewareDispatcher::new(MiddlewareFactory::new()).with_middlewares([
///     MiddlewareDefinition::instance(FnMiddleware::new("deny", |_req: Request, _next: Next| async {
///         HodosResult::Ok(Response::empty(StatusCode::FORBIDDEN))
///     })),
/// ]);
///
/// let fallback = Arc::new(FnHandler::new(|_req: Request| async {
///     HodosResult::Ok(Response::empty(StatusCode::OK))
/// }));
/// let request = http::Request::builder().uri("/").body(Default::default()).unwrap();
/// let response = dispatcher.dispatch(request, fallback).await.unwrap();
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// # });
/// ```
#[derive(Clone)]
pub struct MiddlewareDispatcher {
    factory: MiddlewareFactory,
    definitions: Arc<[MiddlewareDefinition]>,
    stack: Arc<OnceLock<Arc<MiddlewareStack>>>,
}

impl MiddlewareDispatcher {
    /// Creates a dispatcher without middleware.
    #[must_use]
    pub fn new(factory: MiddlewareFactory) -> Self {
        Self {
            factory,
            definitions: Arc::from(Vec::<MiddlewareDefinition>::new()),
            stack: Arc::new(OnceLock::new()),
        }
    }

    /// Returns a dispatcher for `definitions` sharing this one's factory.
    #[must_use]
    pub fn with_middlewares(
        &self,
        definitions: impl IntoIterator<Item = MiddlewareDefinition>,
    ) -> Self {
        Self {
            factory: self.factory.clone(),
            definitions: definitions.into_iter().collect(),
            stack: Arc::new(OnceLock::new()),
        }
    }

    /// Returns `true` if there is at least one definition.
    #[must_use]
    pub fn has_middlewares(&self) -> bool {
        !self.definitions.is_empty()
    }

    /// Returns the factory used to resolve definitions.
    #[must_use]
    pub fn factory(&self) -> &MiddlewareFactory {
        &self.factory
    }

    /// Runs `request` through the middleware, ending in `fallback`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyStack` without middleware, resolution errors for
    /// definitions the request reaches, and any error the chain produces.
    pub async fn dispatch(
        &self,
        request: Request,
        fallback: Arc<dyn RequestHandler>,
    ) -> HandlerResult {
        let stack = self.stack.get_or_init(|| {
            tracing::trace!(middlewares = self.definitions.len(), "building middleware stack");
            Arc::new(MiddlewareStack::new(
                Arc::clone(&self.definitions),
                self.factory.clone(),
                fallback,
            ))
        });
        stack.handle(request).await
    }
}

impl std::fmt::Debug for MiddlewareDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareDispatcher")
            .field("definitions", &self.definitions)
            .field("built", &self.stack.get().is_some())
            .finish_non_exhaustive()
    }
}
