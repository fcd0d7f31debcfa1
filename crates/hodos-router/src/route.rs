//! Route definitions.
//!
//! A [`Route`] is an immutable value describing one endpoint: the methods and
//! path pattern it answers, an optional name, optional hosts, parameter
//! defaults and the middleware definitions that run for it, ending with the
//! action. Routes are built with [`RouteBuilder`]:
//!
//! ```
//! use hodos_core::MiddlewareDefinition;
//! use hodos_router::Route;
//!
//! let route = Route::get("/users/{id}")
//!     .name("user-view")
//!     .host("api.example.com/")
//!     .default_value("format", "json")
//!     .middleware(MiddlewareDefinition::named("auth"))
//!     .to_route();
//!
//! assert_eq!(route.name(), "user-view");
//! assert_eq!(route.hosts(), ["api.example.com"]);
//! assert_eq!(route.enabled_middlewares().len(), 1);
//! ```

use hodos_core::{HodosError, HodosResult, MiddlewareDefinition};
use http::Method;
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// An immutable route definition.
///
/// Every `with_*` method returns a new route. The enabled middleware list is
/// computed on first use and cached, and the cache never outlives a change.
#[derive(Clone)]
pub struct Route {
    methods: Vec<Method>,
    pattern: String,
    name: Option<String>,
    hosts: Vec<String>,
    defaults: IndexMap<String, Option<String>>,
    override_existing: bool,
    action: Option<MiddlewareDefinition>,
    middleware_definitions: Vec<MiddlewareDefinition>,
    disabled_middleware_definitions: Vec<MiddlewareDefinition>,
    default_name: OnceLock<String>,
    enabled_middlewares: OnceLock<Arc<[MiddlewareDefinition]>>,
}

impl Route {
    fn start(methods: Vec<Method>, pattern: impl Into<String>) -> RouteBuilder {
        RouteBuilder {
            route: Self {
                methods,
                pattern: pattern.into(),
                name: None,
                hosts: Vec::new(),
                defaults: IndexMap::new(),
                override_existing: false,
                action: None,
                middleware_definitions: Vec::new(),
                disabled_middleware_definitions: Vec::new(),
                default_name: OnceLock::new(),
                enabled_middlewares: OnceLock::new(),
            },
        }
    }

    /// Starts a `GET` route.
    pub fn get(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::GET], pattern)
    }

    /// Starts a `POST` route.
    pub fn post(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::POST], pattern)
    }

    /// Starts a `PUT` route.
    pub fn put(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::PUT], pattern)
    }

    /// Starts a `DELETE` route.
    pub fn delete(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::DELETE], pattern)
    }

    /// Starts a `PATCH` route.
    pub fn patch(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::PATCH], pattern)
    }

    /// Starts a `HEAD` route.
    pub fn head(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::HEAD], pattern)
    }

    /// Starts an `OPTIONS` route.
    pub fn options(pattern: impl Into<String>) -> RouteBuilder {
        Self::start(vec![Method::OPTIONS], pattern)
    }

    /// Starts a route answering several methods.
    ///
    /// Duplicate methods are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`HodosError::InvalidRoute`] if `methods` is empty.
    pub fn methods(
        methods: impl IntoIterator<Item = Method>,
        pattern: impl Into<String>,
    ) -> HodosResult<RouteBuilder> {
        let mut unique: Vec<Method> = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        let pattern = pattern.into();
        if unique.is_empty() {
            return Err(HodosError::invalid_route(format!(
                "route '{pattern}' must declare at least one method"
            )));
        }
        Ok(Self::start(unique, pattern))
    }

    /// HTTP methods, in declaration order.
    pub fn http_methods(&self) -> &[Method] {
        &self.methods
    }

    /// The path pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The route name, or the default name derived from methods, hosts and pattern.
    pub fn name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.default_name.get_or_init(|| self.compute_default_name()),
        }
    }

    /// Whether a name was set explicitly.
    pub fn has_explicit_name(&self) -> bool {
        self.name.is_some()
    }

    /// Hosts this route is restricted to.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Parameter defaults.
    pub fn defaults(&self) -> &IndexMap<String, Option<String>> {
        &self.defaults
    }

    /// Whether this route replaces an earlier route with the same name.
    pub fn is_override(&self) -> bool {
        self.override_existing
    }

    /// The terminal handler definition.
    pub fn action(&self) -> Option<&MiddlewareDefinition> {
        self.action.as_ref()
    }

    /// Middleware definitions, excluding the action.
    pub fn middleware_definitions(&self) -> &[MiddlewareDefinition] {
        &self.middleware_definitions
    }

    /// Definitions removed from [`enabled_middlewares`](Self::enabled_middlewares).
    pub fn disabled_middleware_definitions(&self) -> &[MiddlewareDefinition] {
        &self.disabled_middleware_definitions
    }

    /// Whether anything would run for this route.
    pub fn has_middlewares(&self) -> bool {
        !self.enabled_middlewares().is_empty()
    }

    /// Middleware definitions minus the disabled ones, followed by the action.
    pub fn enabled_middlewares(&self) -> &[MiddlewareDefinition] {
        self.enabled_middlewares.get_or_init(|| {
            self.middleware_definitions
                .iter()
                .filter(|definition| !self.disabled_middleware_definitions.contains(definition))
                .chain(self.action.iter())
                .cloned()
                .collect()
        })
    }

    /// Returns a copy with a different pattern.
    pub fn with_pattern(&self, pattern: impl Into<String>) -> Self {
        let mut route = self.detached();
        route.pattern = pattern.into();
        route
    }

    /// Returns a copy with a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        let mut route = self.detached();
        route.name = Some(name.into());
        route
    }

    /// Returns a copy restricted to `hosts`.
    pub fn with_hosts<I, S>(&self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut route = self.detached();
        route.hosts = normalize_hosts(hosts);
        route
    }

    /// Returns a copy with `definitions` placed before the existing middleware.
    pub fn with_prepended_middleware(
        &self,
        definitions: impl IntoIterator<Item = MiddlewareDefinition>,
    ) -> Self {
        let mut route = self.detached();
        let mut merged: Vec<MiddlewareDefinition> = definitions.into_iter().collect();
        merged.extend(route.middleware_definitions);
        route.middleware_definitions = merged;
        route
    }

    /// Returns a copy with `definitions` added to the disabled set.
    pub fn with_disabled_middleware(
        &self,
        definitions: impl IntoIterator<Item = MiddlewareDefinition>,
    ) -> Self {
        let mut route = self.detached();
        route.disabled_middleware_definitions.extend(definitions);
        route
    }

    fn detached(&self) -> Self {
        let mut route = self.clone();
        route.default_name = OnceLock::new();
        route.enabled_middlewares = OnceLock::new();
        route
    }

    fn compute_default_name(&self) -> String {
        let methods = self
            .methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{methods} {}{}", self.hosts.join("|"), self.pattern)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods = self
            .methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join("|");
        write!(f, "[{}] {methods} {}{}", self.name(), self.hosts.join("|"), self.pattern)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name())
            .field("methods", &self.methods)
            .field("pattern", &self.pattern)
            .field("hosts", &self.hosts)
            .field("defaults", &self.defaults)
            .field("override", &self.override_existing)
            .field("action", &self.action)
            .field("middlewares", &self.middleware_definitions)
            .field("disabled", &self.disabled_middleware_definitions)
            .finish()
    }
}

/// Builder for [`Route`].
#[derive(Clone)]
#[must_use]
pub struct RouteBuilder {
    route: Route,
}

impl RouteBuilder {
    /// Sets the route name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.route.name = Some(name.into());
        self
    }

    /// Replaces the pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.route.pattern = pattern.into();
        self
    }

    /// Restricts the route to a single host.
    pub fn host(self, host: impl AsRef<str>) -> Self {
        self.hosts([host])
    }

    /// Restricts the route to `hosts`.
    ///
    /// Trailing slashes are trimmed and duplicates dropped.
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.route.hosts = normalize_hosts(hosts);
        self
    }

    /// Replaces all parameter defaults.
    pub fn defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.route.defaults = defaults
            .into_iter()
            .map(|(key, value)| (key.into(), Some(value.to_string())))
            .collect();
        self
    }

    /// Sets one parameter default.
    pub fn default_value(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.route
            .defaults
            .insert(name.into(), Some(value.to_string()));
        self
    }

    /// Declares a parameter default with no value.
    pub fn default_unset(mut self, name: impl Into<String>) -> Self {
        self.route.defaults.insert(name.into(), None);
        self
    }

    /// Marks the route as replacing an earlier route with the same name.
    pub fn override_existing(mut self) -> Self {
        self.route.override_existing = true;
        self
    }

    /// Sets the terminal handler.
    pub fn action(mut self, action: MiddlewareDefinition) -> Self {
        self.route.action = Some(action);
        self
    }

    /// Appends middleware.
    pub fn middleware(mut self, definition: MiddlewareDefinition) -> Self {
        self.route.middleware_definitions.push(definition);
        self
    }

    /// Appends several middleware.
    pub fn middlewares(mut self, definitions: impl IntoIterator<Item = MiddlewareDefinition>) -> Self {
        self.route.middleware_definitions.extend(definitions);
        self
    }

    /// Inserts middleware before the existing ones.
    pub fn prepend_middleware(mut self, definition: MiddlewareDefinition) -> Self {
        self.route.middleware_definitions.insert(0, definition);
        self
    }

    /// Excludes middleware, including middleware inherited from groups.
    pub fn disable_middleware(mut self, definition: MiddlewareDefinition) -> Self {
        self.route.disabled_middleware_definitions.push(definition);
        self
    }

    /// Finishes the route.
    pub fn to_route(self) -> Route {
        self.route
    }
}

impl From<RouteBuilder> for Route {
    fn from(builder: RouteBuilder) -> Self {
        builder.to_route()
    }
}

pub(crate) fn normalize_hosts<I, S>(hosts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for host in hosts {
        let host = host.as_ref().trim_end_matches('/');
        if !normalized.iter().any(|existing| existing == host) {
            normalized.push(host.to_string());
        }
    }
    normalized
}
