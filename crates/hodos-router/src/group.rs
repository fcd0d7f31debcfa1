//! Route groups.
//!
//! A [`Group`] bundles routes and nested groups under a shared path prefix,
//! name prefix, host list and middleware stack. Groups are flattened into
//! plain routes by [`RouteCollection`](crate::RouteCollection).
//!
//! ```
//! use hodos_core::MiddlewareDefinition;
//! use hodos_router::{Group, Route};
//!
//! let api = Group::builder("/api")
//!     .name_prefix("api/")
//!     .middleware(MiddlewareDefinition::named("auth"))
//!     .routes([
//!         Route::get("/users").name("users"),
//!         Route::post("/users").name("users-create"),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(api.prefix(), Some("/api"));
//! assert_eq!(api.items().len(), 2);
//! ```

use crate::route::{normalize_hosts, Route, RouteBuilder};
use hodos_core::{HodosError, HodosResult, MiddlewareDefinition};
use std::sync::{Arc, OnceLock};

/// An entry of a group or collector: a route or a nested group.
#[derive(Clone, Debug)]
pub enum RouteItem {
    /// A single route.
    Route(Route),
    /// A nested group.
    Group(Group),
}

impl From<Route> for RouteItem {
    fn from(route: Route) -> Self {
        Self::Route(route)
    }
}

impl From<RouteBuilder> for RouteItem {
    fn from(builder: RouteBuilder) -> Self {
        Self::Route(builder.to_route())
    }
}

impl From<Group> for RouteItem {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// An immutable group of routes.
#[derive(Clone, Debug, Default)]
pub struct Group {
    prefix: Option<String>,
    name_prefix: Option<String>,
    items: Vec<RouteItem>,
    middleware_definitions: Vec<MiddlewareDefinition>,
    disabled_middleware_definitions: Vec<MiddlewareDefinition>,
    hosts: Vec<String>,
    cors_middleware: Option<MiddlewareDefinition>,
    enabled_middlewares: OnceLock<Arc<[MiddlewareDefinition]>>,
}

impl Group {
    /// Starts a group without a prefix.
    pub fn create() -> GroupBuilder {
        GroupBuilder::new(Self::default())
    }

    /// Starts a group under `prefix`.
    pub fn builder(prefix: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        })
    }

    /// The implicit group wrapping everything a collector holds.
    pub(crate) fn root(items: Vec<RouteItem>, middleware_definitions: Vec<MiddlewareDefinition>) -> Self {
        Self {
            items,
            middleware_definitions,
            ..Self::default()
        }
    }

    /// Path prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Prefix added to explicit route names.
    pub fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref()
    }

    /// Routes and nested groups, in declaration order.
    pub fn items(&self) -> &[RouteItem] {
        &self.items
    }

    /// Hosts inherited by routes that declare none.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Middleware definitions of this group.
    pub fn middleware_definitions(&self) -> &[MiddlewareDefinition] {
        &self.middleware_definitions
    }

    /// Definitions disabled for this group's subtree.
    pub fn disabled_middleware_definitions(&self) -> &[MiddlewareDefinition] {
        &self.disabled_middleware_definitions
    }

    /// Middleware answering synthesized `OPTIONS` routes.
    pub fn cors_middleware(&self) -> Option<&MiddlewareDefinition> {
        self.cors_middleware.as_ref()
    }

    /// Whether this group synthesizes `OPTIONS` routes.
    pub fn has_cors_middleware(&self) -> bool {
        self.cors_middleware.is_some()
    }

    /// Middleware definitions minus the disabled ones.
    pub fn enabled_middlewares(&self) -> &[MiddlewareDefinition] {
        self.enabled_middlewares.get_or_init(|| {
            self.middleware_definitions
                .iter()
                .filter(|definition| !self.disabled_middleware_definitions.contains(definition))
                .cloned()
                .collect()
        })
    }
}

/// Builder for [`Group`].
///
/// Ordering mistakes are recorded and reported by [`build`](Self::build).
#[must_use]
pub struct GroupBuilder {
    group: Group,
    routes_added: bool,
    middleware_prepended: bool,
    error: Option<HodosError>,
}

impl GroupBuilder {
    fn new(group: Group) -> Self {
        Self {
            group,
            routes_added: false,
            middleware_prepended: false,
            error: None,
        }
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(HodosError::invalid_group(message));
        }
    }

    /// Sets the name prefix.
    pub fn name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
        self.group.name_prefix = Some(name_prefix.into());
        self
    }

    /// Restricts the group to a single host.
    pub fn host(self, host: impl AsRef<str>) -> Self {
        self.hosts([host])
    }

    /// Restricts the group to `hosts`.
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.group.hosts = normalize_hosts(hosts);
        self
    }

    /// Appends middleware. Must come before [`routes`](Self::routes).
    pub fn middleware(mut self, definition: MiddlewareDefinition) -> Self {
        if self.routes_added {
            self.fail("middleware() can not be used after routes()");
        }
        self.group.middleware_definitions.push(definition);
        self
    }

    /// Inserts middleware before the existing ones.
    pub fn prepend_middleware(mut self, definition: MiddlewareDefinition) -> Self {
        self.middleware_prepended = true;
        self.group.middleware_definitions.insert(0, definition);
        self
    }

    /// Excludes middleware for the whole subtree.
    pub fn disable_middleware(mut self, definition: MiddlewareDefinition) -> Self {
        self.group.disabled_middleware_definitions.push(definition);
        self
    }

    /// Synthesizes an `OPTIONS` route answered by `middleware` for each endpoint.
    pub fn with_cors(mut self, middleware: MiddlewareDefinition) -> Self {
        self.group.cors_middleware = Some(middleware);
        self
    }

    /// Adds routes and nested groups.
    pub fn routes<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RouteItem>,
    {
        if self.middleware_prepended {
            self.fail("routes() can not be used after prepend_middleware()");
        }
        self.routes_added = true;
        self.group.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Finishes the group.
    ///
    /// # Errors
    ///
    /// Returns [`HodosError::InvalidGroup`] for the first ordering mistake made
    /// while building.
    pub fn build(self) -> HodosResult<Group> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.group),
        }
    }
}
