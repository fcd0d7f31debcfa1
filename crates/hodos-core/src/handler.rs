//! Request handler and middleware traits.
//!
//! A [`RequestHandler`] turns a request into a response. A [`Middleware`]
//! receives the request together with a [`Next`] handle and decides whether
//! to delegate to it, short-circuit, or post-process the delegated response.
//!
//! # Example
//!
//! ```
//! use hodos_core::{BoxFuture, HandlerResult, Middleware, Next, Request};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &str {
//!         "timing"
//!     }
//!
//!     fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let response = next.run(request).await;
//!             let _elapsed = start.elapsed();
//!             response
//!         })
//!     }
//! }
//! ```

use crate::error::HodosResult;
use crate::types::{Request, Response};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The result of handling a request.
pub type HandlerResult = HodosResult<Response>;

/// Something that produces a response for a request.
pub trait RequestHandler: Send + Sync + 'static {
    /// Handles the request.
    fn handle(&self, request: Request) -> BoxFuture<'_, HandlerResult>;
}

/// A request-processing stage.
///
/// Middleware may call `next.run()` at most once. Not calling it
/// short-circuits the chain.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware.
    ///
    /// Used for logging and to compare instance definitions: two instances
    /// with the same name are treated as the same middleware when a route or
    /// group disables one of them.
    fn name(&self) -> &str;

    /// Processes the request, optionally delegating to `next`.
    fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult>;
}

/// Handle to the remainder of a middleware chain.
///
/// Consumed by [`Next::run`], so it can be invoked at most once.
#[derive(Clone)]
pub struct Next {
    handler: Arc<dyn RequestHandler>,
}

impl Next {
    /// Wraps a handler as the continuation of a chain.
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }

    /// Creates a continuation from an async function.
    pub fn from_fn<F, Fut>(func: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::new(Arc::new(FnHandler::new(func)))
    }

    /// Invokes the rest of the chain.
    pub async fn run(self, request: Request) -> HandlerResult {
        self.handler.handle(request).await
    }

    /// Returns the wrapped handler.
    pub fn into_handler(self) -> Arc<dyn RequestHandler> {
        self.handler
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A [`RequestHandler`] backed by an async function.
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Creates a new function-based handler.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, request: Request) -> BoxFuture<'_, HandlerResult> {
        Box::pin((self.func)(request))
    }
}

/// A [`Middleware`] backed by an async function.
///
/// ```
/// use hodos_core::FnMiddleware;
///
/// let middleware = FnMiddleware::new("passthrough", |request: hodos_core::Request, next: hodos_core::Next| async move {
///     next.run(request).await
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult> {
        Box::pin((self.func)(request, next))
    }
}
