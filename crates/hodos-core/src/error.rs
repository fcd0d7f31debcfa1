//! Error types for Hodos.
//!
//! [`HodosError`] is the single error type returned by route building,
//! collection flattening, middleware resolution and dispatch. Each variant
//! belongs to an [`ErrorCategory`] so callers can tell configuration
//! mistakes apart from request-time failures.

use crate::di::InjectionError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`HodosError`].
pub type HodosResult<T> = Result<T, HodosError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid route, group or resource definitions. Detected at build time.
    Configuration,
    /// A middleware definition could not be turned into a middleware.
    Resolution,
    /// A write-once value was written twice.
    State,
    /// A named route does not exist.
    NotFound,
    /// A handler or middleware failed while processing a request.
    Handler,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Configuration | Self::Resolution | Self::State | Self::Handler => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Standard error type for Hodos.
///
/// # Example
///
/// ```
/// use hodos_core::{ErrorCategory, HodosError};
///
/// let err = HodosError::duplicate_route_name("home");
/// assert_eq!(err.category(), ErrorCategory::Configuration);
/// assert_eq!(err.to_string(), "a route with name 'home' already exists");
/// ```
#[derive(Error, Debug)]
pub enum HodosError {
    /// Two routes share a name and the later one is not an override.
    #[error("a route with name '{name}' already exists")]
    DuplicateRouteName {
        /// The conflicting route name.
        name: String,
    },

    /// A group builder was used in an unsupported order.
    #[error("invalid group: {message}")]
    InvalidGroup {
        /// Human-readable error message.
        message: String,
    },

    /// A route definition is malformed.
    #[error("invalid route: {message}")]
    InvalidRoute {
        /// Human-readable error message.
        message: String,
    },

    /// A method-failure response was requested without any allowed methods.
    #[error("allowed methods list must not be empty")]
    EmptyAllowedMethods,

    /// A route resource path does not exist.
    #[error("route resource not found: {}", path.display())]
    ResourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A route resource could not be read or parsed.
    #[error("invalid route resource {}: {message}", path.display())]
    InvalidResource {
        /// The offending path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A middleware definition cannot be resolved to a middleware.
    #[error("invalid middleware definition '{definition}': {reason}")]
    InvalidMiddlewareDefinition {
        /// Display form of the definition.
        definition: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The definition needs a service container and none was configured.
    #[error("a container is required to resolve middleware '{definition}'")]
    ContainerRequired {
        /// Display form of the definition.
        definition: String,
    },

    /// A service could not be injected while building a middleware or controller.
    #[error(transparent)]
    Injection(#[from] InjectionError),

    /// A middleware stack was dispatched with no middleware in it.
    #[error("middleware stack is empty: there must be at least one handler")]
    EmptyStack,

    /// The current route was already set for this request.
    #[error("current route is already set to '{name}'")]
    RouteAlreadySet {
        /// Name of the route already set.
        name: String,
    },

    /// The current URI was already set for this request.
    #[error("current URI is already set to '{uri}'")]
    UriAlreadySet {
        /// The URI already set.
        uri: String,
    },

    /// Lookup of a route by name failed.
    #[error("cannot find route with name '{name}'")]
    RouteNotFound {
        /// The requested name.
        name: String,
    },

    /// A handler or middleware failed.
    #[error("handler error: {0}")]
    Handler(#[from] anyhow::Error),
}

impl HodosError {
    /// Creates a duplicate route name error.
    pub fn duplicate_route_name(name: impl Into<String>) -> Self {
        Self::DuplicateRouteName { name: name.into() }
    }

    /// Creates an invalid group error.
    pub fn invalid_group(message: impl Into<String>) -> Self {
        Self::InvalidGroup {
            message: message.into(),
        }
    }

    /// Creates an invalid route error.
    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::InvalidRoute {
            message: message.into(),
        }
    }

    /// Creates an invalid resource error.
    pub fn invalid_resource(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidResource {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid middleware definition error.
    pub fn invalid_definition(definition: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidMiddlewareDefinition {
            definition: definition.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a container-required error.
    pub fn container_required(definition: impl ToString) -> Self {
        Self::ContainerRequired {
            definition: definition.to_string(),
        }
    }

    /// Creates a route-not-found error.
    pub fn route_not_found(name: impl Into<String>) -> Self {
        Self::RouteNotFound { name: name.into() }
    }

    /// Wraps an arbitrary failure raised by a handler.
    pub fn handler(error: impl Into<anyhow::Error>) -> Self {
        Self::Handler(error.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateRouteName { .. }
            | Self::InvalidGroup { .. }
            | Self::InvalidRoute { .. }
            | Self::EmptyAllowedMethods
            | Self::ResourceNotFound { .. }
            | Self::InvalidResource { .. } => ErrorCategory::Configuration,
            Self::InvalidMiddlewareDefinition { .. }
            | Self::ContainerRequired { .. }
            | Self::Injection(_)
            | Self::EmptyStack => ErrorCategory::Resolution,
            Self::RouteAlreadySet { .. } | Self::UriAlreadySet { .. } => ErrorCategory::State,
            Self::RouteNotFound { .. } => ErrorCategory::NotFound,
            Self::Handler(_) => ErrorCategory::Handler,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns `true` if this is a route-not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            HodosError::invalid_group("x").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(HodosError::EmptyStack.category(), ErrorCategory::Resolution);
        assert_eq!(
            HodosError::UriAlreadySet { uri: "/".into() }.category(),
            ErrorCategory::State
        );
        assert_eq!(
            HodosError::route_not_found("x").category(),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn test_route_not_found_is_distinct() {
        let err = HodosError::route_not_found("missing");
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(!HodosError::duplicate_route_name("missing").is_not_found());
    }

    #[test]
    fn test_injection_error_converts() {
        let err: HodosError = InjectionError::not_registered::<String>().into();
        assert_eq!(err.category(), ErrorCategory::Resolution);
        assert!(err.to_string().contains("String"));
    }

    #[test]
    fn test_handler_error_wraps_anyhow() {
        let err = HodosError::handler(anyhow::anyhow!("boom"));
        assert_eq!(err.category(), ErrorCategory::Handler);
        assert_eq!(err.to_string(), "handler error: boom");
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ErrorCategory::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }
}
