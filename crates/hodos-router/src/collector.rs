//! Accumulation of routes before flattening.

use crate::group::RouteItem;
use crate::provider::RoutesProvider;
use hodos_core::{HodosResult, MiddlewareDefinition};
use std::fmt;
use std::sync::Arc;

enum Entry {
    Item(RouteItem),
    Resource(Arc<dyn RoutesProvider>),
}

/// Collects routes, groups and resources for a
/// [`RouteCollection`](crate::RouteCollection).
///
/// Middleware added to the collector applies to every collected route.
///
/// ```
/// use hodos_core::MiddlewareDefinition;
/// use hodos_router::{ArrayRoutesProvider, Route, RouteCollector};
///
/// let mut collector = RouteCollector::new();
/// collector
///     .middleware(MiddlewareDefinition::named("session"))
///     .add_route(Route::get("/"))
///     .add_resource(ArrayRoutesProvider::new([Route::get("/about")]));
///
/// assert_eq!(collector.items().unwrap().len(), 2);
/// ```
#[derive(Default)]
pub struct RouteCollector {
    entries: Vec<Entry>,
    middleware_definitions: Vec<MiddlewareDefinition>,
}

impl RouteCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route or group.
    pub fn add_route(&mut self, item: impl Into<RouteItem>) -> &mut Self {
        self.entries.push(Entry::Item(item.into()));
        self
    }

    /// Adds several routes or groups.
    pub fn add_routes<I, T>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RouteItem>,
    {
        self.entries
            .extend(items.into_iter().map(|item| Entry::Item(item.into())));
        self
    }

    /// Adds a resource, read when the collection is built.
    pub fn add_resource(&mut self, provider: impl RoutesProvider + 'static) -> &mut Self {
        self.entries.push(Entry::Resource(Arc::new(provider)));
        self
    }

    /// Appends middleware applied to all routes.
    pub fn middleware(&mut self, definition: MiddlewareDefinition) -> &mut Self {
        self.middleware_definitions.push(definition);
        self
    }

    /// Inserts middleware applied to all routes before the existing ones.
    pub fn prepend_middleware(&mut self, definition: MiddlewareDefinition) -> &mut Self {
        self.middleware_definitions.insert(0, definition);
        self
    }

    /// Collector-level middleware.
    pub fn middleware_definitions(&self) -> &[MiddlewareDefinition] {
        &self.middleware_definitions
    }

    /// All items, with resources read in registration order.
    pub fn items(&self) -> HodosResult<Vec<RouteItem>> {
        let mut items = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Item(item) => items.push(item.clone()),
                Entry::Resource(provider) => items.extend(provider.routes()?),
            }
        }
        Ok(items)
    }
}

impl fmt::Debug for RouteCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resources = self
            .entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Resource(_)))
            .count();
        f.debug_struct("RouteCollector")
            .field("entries", &self.entries.len())
            .field("resources", &resources)
            .field("middlewares", &self.middleware_definitions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ArrayRoutesProvider;
    use crate::Route;
    use hodos_core::HodosError;

    struct FailingProvider;

    impl RoutesProvider for FailingProvider {
        fn routes(&self) -> HodosResult<Vec<RouteItem>> {
            Err(HodosError::invalid_resource("broken.toml", "boom"))
        }
    }

    fn pattern(item: &RouteItem) -> &str {
        match item {
            RouteItem::Route(route) => route.pattern(),
            RouteItem::Group(_) => "",
        }
    }

    #[test]
    fn test_items_keep_registration_order() {
        let mut collector = RouteCollector::new();
        collector
            .add_route(Route::get("/a"))
            .add_resource(ArrayRoutesProvider::new([Route::get("/b"), Route::get("/c")]))
            .add_routes([Route::get("/d")]);

        let items = collector.items().unwrap();
        let patterns: Vec<_> = items.iter().map(pattern).collect();
        assert_eq!(patterns, ["/a", "/b", "/c", "/d"]);
    }

    #[test]
    fn test_middleware_order() {
        let mut collector = RouteCollector::new();
        collector
            .middleware(MiddlewareDefinition::named("b"))
            .prepend_middleware(MiddlewareDefinition::named("a"));
        assert_eq!(
            collector.middleware_definitions(),
            [MiddlewareDefinition::named("a"), MiddlewareDefinition::named("b")]
        );
    }

    #[test]
    fn test_resource_errors_propagate() {
        let mut collector = RouteCollector::new();
        collector.add_resource(FailingProvider);
        assert!(collector.items().is_err());
    }
}
