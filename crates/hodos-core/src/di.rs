//! Service container used to resolve middleware and controllers.
//!
//! The container holds two registries:
//!
//! - typed services keyed by [`TypeId`], resolved with [`Container::resolve`]
//! - middleware instances keyed by name, resolved with [`Container::middleware`]
//!
//! Middleware registered with [`Container::register_middleware`] is keyed by
//! its Rust type name, which is the same key a
//! [`MiddlewareDefinition::class`](crate::MiddlewareDefinition::class)
//! definition looks up. Route files refer to middleware by name and resolve
//! through [`Container::register_middleware_as`].
//!
//! # Example
//!
//! ```rust
//! use hodos_core::di::{Container, Injectable, InjectionError};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserController {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserController {
//!     fn inject(container: &Container) -> Result<Self, InjectionError> {
//!         Ok(Self { db: container.resolve_required()? })
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register(Arc::new(Database { url: "postgres://localhost/db".into() }));
//!
//! let controller = container.instantiate::<UserController>().unwrap();
//! assert_eq!(controller.db.url, "postgres://localhost/db");
//! ```

use crate::handler::Middleware;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Error when a dependency cannot be resolved.
#[derive(Debug, Clone)]
pub struct InjectionError {
    /// The type or name that could not be resolved.
    pub type_name: String,
    /// The reason for the failure.
    pub reason: String,
}

impl fmt::Display for InjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to inject {}: {}", self.type_name, self.reason)
    }
}

impl std::error::Error for InjectionError {}

impl InjectionError {
    /// Creates an injection error for a service that is not registered.
    pub fn not_registered<T>() -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            reason: "service not registered".to_string(),
        }
    }

    /// Creates an injection error with a custom reason.
    pub fn custom<T>(reason: impl Into<String>) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            reason: reason.into(),
        }
    }
}

/// Types that can build themselves from a [`Container`].
///
/// Middleware referenced by class and controllers referenced by action
/// definitions implement this so the factory can construct them on demand.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Builds an instance, pulling dependencies from the container.
    fn inject(container: &Container) -> Result<Self, InjectionError>;
}

/// A service container.
///
/// Services are registered once at startup. The container is `Send + Sync`
/// and is shared behind an `Arc` by the middleware factory.
#[derive(Default)]
pub struct Container {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    middlewares: HashMap<String, Arc<dyn Middleware>>,
}

impl Container {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed service.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Resolves a typed service, returning `None` if it is not registered.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| s.clone().downcast::<T>().ok())
    }

    /// Resolves a typed service or returns an error.
    pub fn resolve_required<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.resolve().ok_or_else(InjectionError::not_registered::<T>)
    }

    /// Checks if a typed service is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Returns a registered service, or builds one with [`Injectable::inject`].
    ///
    /// Built instances are not cached.
    pub fn instantiate<T: Injectable>(&self) -> Result<Arc<T>, InjectionError> {
        if let Some(service) = self.resolve::<T>() {
            return Ok(service);
        }
        T::inject(self).map(Arc::new)
    }

    /// Registers a middleware instance under its type name.
    pub fn register_middleware<M: Middleware>(&mut self, middleware: Arc<M>) {
        self.middlewares
            .insert(std::any::type_name::<M>().to_string(), middleware);
    }

    /// Registers a middleware instance under an arbitrary name.
    pub fn register_middleware_as(
        &mut self,
        name: impl Into<String>,
        middleware: Arc<dyn Middleware>,
    ) {
        self.middlewares.insert(name.into(), middleware);
    }

    /// Looks up a middleware registered under `name`.
    #[must_use]
    pub fn middleware(&self, name: &str) -> Option<Arc<dyn Middleware>> {
        self.middlewares.get(name).cloned()
    }

    /// Checks if a middleware is registered under `name`.
    #[must_use]
    pub fn has_middleware(&self, name: &str) -> bool {
        self.middlewares.contains_key(name)
    }

    /// Returns the number of registered services and middlewares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len() + self.middlewares.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.middlewares.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.middlewares.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Container")
            .field("service_count", &self.services.len())
            .field("middlewares", &names)
            .finish()
    }
}
