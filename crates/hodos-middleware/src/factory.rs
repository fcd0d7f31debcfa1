//! Resolution of middleware definitions.

use crate::action::ActionCaller;
use hodos_core::{Container, HodosError, HodosResult, Middleware, MiddlewareDefinition};
use hodos_telemetry::metrics::record_middleware_resolution;
use std::sync::Arc;

/// Turns a [`MiddlewareDefinition`] into a runnable [`Middleware`].
///
/// Class and action definitions need a [`Container`]: class definitions are
/// looked up in its middleware registry or built with their constructor, and
/// action controllers are instantiated from it on every call. Callables and
/// instances resolve without one.
#[derive(Clone, Default)]
pub struct MiddlewareFactory {
    container: Option<Arc<Container>>,
}

impl MiddlewareFactory {
    /// Creates a factory without a container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory resolving through `container`.
    #[must_use]
    pub fn with_container(container: Arc<Container>) -> Self {
        Self {
            container: Some(container),
        }
    }

    /// Returns the container, if any.
    #[must_use]
    pub fn container(&self) -> Option<&Arc<Container>> {
        self.container.as_ref()
    }

    /// Resolves a definition.
    ///
    /// # Errors
    ///
    /// - `ContainerRequired` for class and action definitions when the
    ///   factory has no container
    /// - `InvalidMiddlewareDefinition` for a name that is not registered and
    ///   has no constructor
    /// - `Injection` when a constructor fails
    pub fn create(&self, definition: &MiddlewareDefinition) -> HodosResult<Arc<dyn Middleware>> {
        let middleware: Arc<dyn Middleware> = match definition {
            MiddlewareDefinition::Instance(middleware) => Arc::clone(middleware),
            MiddlewareDefinition::Class(class) => {
                let container = self.require_container(definition)?;
                if let Some(middleware) = container.middleware(class.name()) {
                    middleware
                } else if let Some(constructor) = class.constructor() {
                    constructor(container)?
                } else {
                    return Err(HodosError::invalid_definition(
                        definition,
                        "not a registered middleware",
                    ));
                }
            }
            MiddlewareDefinition::Action(action) => {
                let container = self.require_container(definition)?;
                Arc::new(ActionCaller::action(action.clone(), Arc::clone(container)))
            }
            MiddlewareDefinition::Callable(callable) => {
                Arc::new(ActionCaller::callable(callable.clone()))
            }
        };

        record_middleware_resolution(definition.kind());
        tracing::trace!(definition = %definition, kind = definition.kind(), "middleware resolved");
        Ok(middleware)
    }

    fn require_container(&self, definition: &MiddlewareDefinition) -> HodosResult<&Arc<Container>> {
        self.container
            .as_ref()
            .ok_or_else(|| HodosError::container_required(definition))
    }
}

impl std::fmt::Debug for MiddlewareFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareFactory")
            .field("container", &self.container)
            .finish()
    }
}
