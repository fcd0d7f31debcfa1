//! Route resources.
//!
//! A [`RoutesProvider`] supplies route items to a
//! [`RouteCollector`](crate::RouteCollector). Resources are read when the
//! collection is built, in the order they were added.

use crate::group::RouteItem;
use hodos_core::HodosResult;

/// A source of route items.
pub trait RoutesProvider: Send + Sync {
    /// Produces the items of this resource.
    fn routes(&self) -> HodosResult<Vec<RouteItem>>;
}

/// A resource backed by items built in code.
#[derive(Debug, Clone, Default)]
pub struct ArrayRoutesProvider {
    items: Vec<RouteItem>,
}

impl ArrayRoutesProvider {
    /// Wraps `items`.
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RouteItem>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl RoutesProvider for ArrayRoutesProvider {
    fn routes(&self) -> HodosResult<Vec<RouteItem>> {
        Ok(self.items.clone())
    }
}
