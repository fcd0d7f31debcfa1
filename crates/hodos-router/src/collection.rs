//! The flattened route collection.
//!
//! [`RouteCollection::new`] walks the collector's items depth-first and
//! turns every route into a fully resolved [`Route`]: prefixes concatenated,
//! group middleware prepended, disabled definitions merged and hosts
//! inherited. Names must be unique unless a route is marked as an override,
//! in which case it replaces the earlier route at the earlier position.
//!
//! Groups configured with CORS middleware get one synthesized `OPTIONS`
//! route per distinct pattern and host set in their subtree, appended after
//! the group's own routes, unless an `OPTIONS` route for that endpoint
//! already exists. An explicit `OPTIONS` route registered later replaces the
//! synthesized one.

use crate::collector::RouteCollector;
use crate::group::{Group, RouteItem};
use crate::route::Route;
use hodos_core::{HodosError, HodosResult, MiddlewareDefinition};
use hodos_telemetry::metrics::set_routes_registered;
use http::Method;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A node of the route tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTreeNode {
    /// A route, by resolved name.
    Route(String),
    /// A prefixed group and its children.
    Group {
        /// Group prefix as declared.
        prefix: String,
        /// Nested nodes.
        items: Vec<RouteTreeNode>,
    },
}

/// (pattern, hosts) of an endpoint.
type Endpoint = (String, Vec<String>);

/// What a group passes down to its subtree.
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    name_prefix: String,
    middlewares: Vec<MiddlewareDefinition>,
    disabled: Vec<MiddlewareDefinition>,
    hosts: Vec<String>,
}

impl Scope {
    fn enter(&self, group: &Group) -> Self {
        let mut middlewares = self.middlewares.clone();
        middlewares.extend(group.enabled_middlewares().iter().cloned());

        let mut disabled = self.disabled.clone();
        disabled.extend(group.disabled_middleware_definitions().iter().cloned());

        let hosts = if group.hosts().is_empty() {
            self.hosts.clone()
        } else {
            group.hosts().to_vec()
        };

        Self {
            prefix: format!("{}{}", self.prefix, group.prefix().unwrap_or_default()),
            name_prefix: format!("{}{}", self.name_prefix, group.name_prefix().unwrap_or_default()),
            middlewares,
            disabled,
            hosts,
        }
    }

    fn resolve(&self, route: &Route) -> Route {
        let mut resolved = route.with_pattern(format!("{}{}", self.prefix, route.pattern()));
        if route.has_explicit_name() && !self.name_prefix.is_empty() {
            resolved = resolved.with_name(format!("{}{}", self.name_prefix, route.name()));
        }
        if route.hosts().is_empty() && !self.hosts.is_empty() {
            resolved = resolved.with_hosts(&self.hosts);
        }
        if !self.middlewares.is_empty() {
            resolved = resolved.with_prepended_middleware(self.middlewares.iter().cloned());
        }
        if !self.disabled.is_empty() {
            resolved = resolved.with_disabled_middleware(self.disabled.iter().cloned());
        }
        resolved
    }
}

#[derive(Default)]
struct Flattener {
    routes: IndexMap<String, Arc<Route>>,
    /// Names of synthesized preflight routes still in `routes`.
    synthesized: HashSet<String>,
}

impl Flattener {
    /// Flattens `group` into `self.routes`, returning the endpoints it reached.
    fn inject_group(
        &mut self,
        group: &Group,
        parent: &Scope,
        tree: &mut Vec<RouteTreeNode>,
    ) -> HodosResult<Vec<Endpoint>> {
        let scope = parent.enter(group);
        let mut endpoints: Vec<Endpoint> = Vec::new();

        for item in group.items() {
            match item {
                RouteItem::Route(route) => {
                    let resolved = scope.resolve(route);
                    let endpoint = (resolved.pattern().to_string(), resolved.hosts().to_vec());
                    self.register(resolved, tree)?;
                    push_unique(&mut endpoints, endpoint);
                }
                RouteItem::Group(child) => {
                    let reached = match child.prefix().filter(|prefix| !prefix.is_empty()) {
                        Some(prefix) => {
                            let mut items = Vec::new();
                            let reached = self.inject_group(child, &scope, &mut items)?;
                            tree.push(RouteTreeNode::Group {
                                prefix: prefix.to_string(),
                                items,
                            });
                            reached
                        }
                        None => self.inject_group(child, &scope, tree)?,
                    };
                    for endpoint in reached {
                        push_unique(&mut endpoints, endpoint);
                    }
                }
            }
        }

        if let Some(cors) = group.cors_middleware() {
            for (pattern, hosts) in &endpoints {
                self.synthesize_preflight(pattern, hosts, cors, tree)?;
            }
        }

        Ok(endpoints)
    }

    fn synthesize_preflight(
        &mut self,
        pattern: &str,
        hosts: &[String],
        cors: &MiddlewareDefinition,
        tree: &mut Vec<RouteTreeNode>,
    ) -> HodosResult<()> {
        let exists = self.routes.values().any(|route| {
            route.pattern() == pattern
                && route.hosts() == hosts
                && route.http_methods().contains(&Method::OPTIONS)
        });
        if exists {
            debug!(pattern, "OPTIONS route already present, skipping CORS synthesis");
            return Ok(());
        }

        let preflight = Route::options(pattern)
            .hosts(hosts)
            .middleware(cors.clone())
            .to_route();
        debug!(pattern, middleware = %cors, "synthesized CORS preflight route");
        let name = preflight.name().to_string();
        self.register(preflight, tree)?;
        self.synthesized.insert(name);
        Ok(())
    }

    /// Drops synthesized preflights for the endpoint of an explicit `OPTIONS`
    /// route. A preflight sharing the route's name is left for the caller to
    /// replace in place; returns whether one exists.
    fn yield_preflights(&mut self, route: &Route) -> bool {
        if self.synthesized.is_empty() || !route.http_methods().contains(&Method::OPTIONS) {
            return false;
        }

        let matching: Vec<String> = self
            .synthesized
            .iter()
            .filter(|name| {
                self.routes.get(name.as_str()).is_some_and(|preflight| {
                    preflight.pattern() == route.pattern() && preflight.hosts() == route.hosts()
                })
            })
            .cloned()
            .collect();

        let mut same_name = false;
        for name in matching {
            if name == route.name() {
                same_name = true;
                continue;
            }
            debug!(
                route = %name,
                replacement = route.name(),
                "dropping synthesized CORS preflight route"
            );
            self.routes.shift_remove(&name);
            self.synthesized.remove(&name);
        }
        same_name
    }

    fn register(&mut self, route: Route, tree: &mut Vec<RouteTreeNode>) -> HodosResult<()> {
        let name = route.name().to_string();
        let replaces_preflight = self.yield_preflights(&route);
        if self.routes.contains_key(&name) {
            if replaces_preflight {
                debug!(
                    route = %name,
                    pattern = route.pattern(),
                    "explicit route replaces synthesized CORS preflight"
                );
                self.synthesized.remove(&name);
                self.routes.insert(name, Arc::new(route));
                return Ok(());
            }
            if !route.is_override() {
                return Err(HodosError::duplicate_route_name(name));
            }
            warn!(route = %name, pattern = route.pattern(), "overriding existing route");
            self.synthesized.remove(&name);
            self.routes.insert(name, Arc::new(route));
            return Ok(());
        }

        debug!(
            route = %name,
            pattern = route.pattern(),
            middlewares = route.enabled_middlewares().len(),
            "registered route"
        );
        tree.push(RouteTreeNode::Route(name.clone()));
        self.routes.insert(name, Arc::new(route));
        Ok(())
    }
}

/// Removes route nodes whose route was dropped during flattening.
fn prune_tree(tree: &mut Vec<RouteTreeNode>, routes: &IndexMap<String, Arc<Route>>) {
    tree.retain_mut(|node| match node {
        RouteTreeNode::Route(name) => routes.contains_key(name.as_str()),
        RouteTreeNode::Group { items, .. } => {
            prune_tree(items, routes);
            true
        }
    });
}

fn push_unique(endpoints: &mut Vec<Endpoint>, endpoint: Endpoint) {
    if !endpoints.contains(&endpoint) {
        endpoints.push(endpoint);
    }
}

/// The immutable, flattened set of routes.
///
/// ```
/// use hodos_router::{Group, Route, RouteCollection, RouteCollector};
///
/// let mut collector = RouteCollector::new();
/// collector.add_route(
///     Group::builder("/api")
///         .name_prefix("api/")
///         .routes([Route::get("/users").name("users")])
///         .build()
///         .unwrap(),
/// );
///
/// let collection = RouteCollection::new(&collector).unwrap();
/// assert_eq!(collection.route("api/users").unwrap().pattern(), "/api/users");
/// ```
#[derive(Debug, Clone)]
pub struct RouteCollection {
    routes: IndexMap<String, Arc<Route>>,
    tree: Vec<RouteTreeNode>,
}

impl RouteCollection {
    /// Flattens everything `collector` holds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for duplicate route names and any error
    /// raised by the collector's resources.
    pub fn new(collector: &RouteCollector) -> HodosResult<Self> {
        let root = Group::root(collector.items()?, collector.middleware_definitions().to_vec());

        let mut flattener = Flattener::default();
        let mut tree = Vec::new();
        flattener.inject_group(&root, &Scope::default(), &mut tree)?;

        let routes = flattener.routes;
        prune_tree(&mut tree, &routes);
        info!(routes = routes.len(), "route collection built");
        set_routes_registered(routes.len());

        Ok(Self { routes, tree })
    }

    /// Looks up a route by name.
    ///
    /// # Errors
    ///
    /// Returns [`HodosError::RouteNotFound`] if no route has that name.
    pub fn route(&self, name: &str) -> HodosResult<&Arc<Route>> {
        self.routes
            .get(name)
            .ok_or_else(|| HodosError::route_not_found(name))
    }

    /// Whether a route with that name exists.
    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// All routes, in flattening order.
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &Arc<Route>> + '_ {
        self.routes.values()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route names nested by group prefix.
    pub fn route_tree(&self) -> &[RouteTreeNode] {
        &self.tree
    }
}
