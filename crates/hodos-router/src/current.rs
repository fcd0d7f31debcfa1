//! Request-scoped routing state.
//!
//! The routing middleware stores a [`CurrentRoute`] in the request
//! extensions once a route has matched. Downstream middleware and actions
//! read it back:
//!
//! ```
//! use hodos_router::CurrentRoute;
//!
//! fn route_name(request: &hodos_core::Request) -> Option<&str> {
//!     request.extensions().get::<CurrentRoute>()?.name()
//! }
//! ```

use crate::matching::Arguments;
use crate::route::Route;
use hodos_core::{HodosError, HodosResult};
use http::{Method, Uri};
use std::sync::Arc;

/// The route matched for the request being processed.
///
/// The route and the URI can each be set once. [`reset`](Self::reset)
/// clears everything.
#[derive(Debug, Clone, Default)]
pub struct CurrentRoute {
    route: Option<Arc<Route>>,
    uri: Option<Uri>,
    arguments: Arguments,
}

impl CurrentRoute {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the matched route.
    ///
    /// # Errors
    ///
    /// Returns [`HodosError::RouteAlreadySet`] if a route was already recorded.
    pub fn set_route(&mut self, route: Arc<Route>) -> HodosResult<()> {
        if let Some(current) = &self.route {
            return Err(HodosError::RouteAlreadySet {
                name: current.name().to_string(),
            });
        }
        self.route = Some(route);
        Ok(())
    }

    /// Records the matched route together with its arguments.
    pub fn set_route_with_arguments(
        &mut self,
        route: Arc<Route>,
        arguments: Arguments,
    ) -> HodosResult<()> {
        self.set_route(route)?;
        self.arguments = arguments;
        Ok(())
    }

    /// Records the request URI.
    ///
    /// # Errors
    ///
    /// Returns [`HodosError::UriAlreadySet`] if a URI was already recorded.
    pub fn set_uri(&mut self, uri: Uri) -> HodosResult<()> {
        if let Some(current) = &self.uri {
            return Err(HodosError::UriAlreadySet {
                uri: current.to_string(),
            });
        }
        self.uri = Some(uri);
        Ok(())
    }

    /// Clears the route, URI and arguments.
    pub fn reset(&mut self) {
        self.route = None;
        self.uri = None;
        self.arguments = Arguments::new();
    }

    /// The matched route.
    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    /// Name of the matched route.
    pub fn name(&self) -> Option<&str> {
        self.route.as_deref().map(Route::name)
    }

    /// Pattern of the matched route.
    pub fn pattern(&self) -> Option<&str> {
        self.route.as_deref().map(Route::pattern)
    }

    /// Methods of the matched route.
    pub fn methods(&self) -> Option<&[Method]> {
        self.route.as_deref().map(Route::http_methods)
    }

    /// Hosts of the matched route.
    pub fn hosts(&self) -> Option<&[String]> {
        self.route.as_deref().map(Route::hosts)
    }

    /// The request URI.
    pub fn uri(&self) -> Option<&Uri> {
        self.uri.as_ref()
    }

    /// Arguments of the match.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// A single argument.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name)
    }

    /// A single argument, or `default` when absent.
    pub fn argument_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.arguments.get_or(name, default)
    }
}
