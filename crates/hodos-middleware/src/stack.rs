//! The nested middleware chain.
//!
//! A stack wraps its definitions around a fallback handler, first definition
//! outermost:
//!
//! ```text
//! request → m1 → m2 → … → mN → fallback
//! ```
//!
//! Each link resolves its definition the first time a request reaches it, so
//! middleware behind a short-circuiting one is never constructed. A stack
//! without definitions has no handler to run and fails every request with
//! `EmptyStack`.

use crate::factory::MiddlewareFactory;
use hodos_core::{
    BoxFuture, HandlerResult, HodosError, HodosResult, Middleware, MiddlewareDefinition, Next,
    Request, RequestHandler,
};
use std::sync::{Arc, OnceLock};

/// A chain of middleware definitions ending in a fallback handler.
pub struct MiddlewareStack {
    definitions: Arc<[MiddlewareDefinition]>,
    factory: MiddlewareFactory,
    fallback: Arc<dyn RequestHandler>,
    chain: OnceLock<Arc<dyn RequestHandler>>,
}

impl MiddlewareStack {
    /// Creates a stack. The chain is composed on the first request.
    pub fn new(
        definitions: impl Into<Arc<[MiddlewareDefinition]>>,
        factory: MiddlewareFactory,
        fallback: Arc<dyn RequestHandler>,
    ) -> Self {
        Self {
            definitions: definitions.into(),
            factory,
            fallback,
            chain: OnceLock::new(),
        }
    }

    /// Number of definitions in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the stack has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn chain(&self) -> &Arc<dyn RequestHandler> {
        self.chain.get_or_init(|| {
            self.definitions
                .iter()
                .rev()
                .fold(Arc::clone(&self.fallback), |next, definition| {
                    Arc::new(Link {
                        definition: definition.clone(),
                        factory: self.factory.clone(),
                        resolved: OnceLock::new(),
                        next,
                    })
                })
        })
    }
}

impl RequestHandler for MiddlewareStack {
    fn handle(&self, request: Request) -> BoxFuture<'_, HandlerResult> {
        if self.definitions.is_empty() {
            return Box::pin(async { Err(HodosError::EmptyStack) });
        }
        self.chain().handle(request)
    }
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("definitions", &self.definitions)
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

struct Link {
    definition: MiddlewareDefinition,
    factory: MiddlewareFactory,
    resolved: OnceLock<Arc<dyn Middleware>>,
    next: Arc<dyn RequestHandler>,
}

impl Link {
    fn middleware(&self) -> HodosResult<&Arc<dyn Middleware>> {
        if let Some(middleware) = self.resolved.get() {
            return Ok(middleware);
        }
        let middleware = self.factory.create(&self.definition)?;
        Ok(self.resolved.get_or_init(|| middleware))
    }
}

impl RequestHandler for Link {
    fn handle(&self, request: Request) -> BoxFuture<'_, HandlerResult> {
        Box::pin(async move {
            let middleware = self.middleware()?;
            let name = middleware.name();

            tracing::debug!(middleware = name, "before middleware");
            let response = middleware
                .process(request, Next::new(Arc::clone(&self.next)))
                .await;
            tracing::debug!(middleware = name, ok = response.is_ok(), "after middleware");

            response
        })
    }
}
