//! Adapter running actions and callables as middleware.

use hodos_core::{
    ActionOutcome, ActionRef, BoxFuture, CallableRef, Container, HandlerResult, Middleware, Next,
    Request,
};
use std::sync::Arc;

enum Target {
    Action {
        action: ActionRef,
        container: Arc<Container>,
    },
    Callable(CallableRef),
}

/// Runs a controller action or a callable as a [`Middleware`].
///
/// A controller is instantiated from the container on every call. When the
/// action or callable returns [`ActionOutcome::Delegate`], the returned
/// middleware processes the request in its place.
pub struct ActionCaller {
    name: String,
    target: Target,
}

impl ActionCaller {
    /// Wraps a controller action.
    pub fn action(action: ActionRef, container: Arc<Container>) -> Self {
        Self {
            name: format!("{}::{}", action.class(), action.method()),
            target: Target::Action { action, container },
        }
    }

    /// Wraps a callable.
    pub fn callable(callable: CallableRef) -> Self {
        Self {
            name: callable.name().to_string(),
            target: Target::Callable(callable),
        }
    }
}

impl Middleware for ActionCaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult> {
        let outcome = match &self.target {
            Target::Action { action, container } => action.invoke(container, request, next),
            Target::Callable(callable) => callable.invoke(request, next),
        };

        Box::pin(async move {
            match outcome.await? {
                ActionOutcome::Response(response) => Ok(response),
                ActionOutcome::Delegate {
                    middleware,
                    request,
                    next,
                } => {
                    tracing::trace!(middleware = middleware.name(), "action delegated");
                    middleware.process(request, next).await
                }
            }
        })
    }
}

impl std::fmt::Debug for ActionCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCaller")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
