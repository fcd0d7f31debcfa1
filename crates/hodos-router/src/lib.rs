//! # Hodos Router
//!
//! Route definitions and the flattened route collection for Hodos.
//!
//! Routes and groups are immutable values built with fluent builders. A
//! [`RouteCollector`] accumulates them, together with resources such as
//! route files, and [`RouteCollection::new`] flattens the tree once into a
//! name-indexed set of fully resolved routes.
//!
//! ## Example
//!
//! ```rust
//! use hodos_core::MiddlewareDefinition;
//! use hodos_router::{Group, Route, RouteCollection, RouteCollector};
//!
//! let mut collector = RouteCollector::new();
//! collector.add_route(
//!     Group::builder("/api")
//!         .middleware(MiddlewareDefinition::named("auth"))
//!         .routes([Route::get("/users")
//!             .name("users")
//!             .action(MiddlewareDefinition::named("UserController::index"))])
//!         .build()
//!         .unwrap(),
//! );
//!
//! let routes = RouteCollection::new(&collector).unwrap();
//! let users = routes.route("users").unwrap();
//! assert_eq!(users.pattern(), "/api/users");
//! assert_eq!(users.enabled_middlewares().len(), 2);
//! ```
//!
//! Matching requests against the collection is left to a [`UrlMatcher`]
//! implementation.

#![doc(html_root_url = "https://docs.rs/hodos-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod collection;
mod collector;
mod current;
mod file;
mod group;
mod matching;
mod provider;
mod route;

pub use collection::{RouteCollection, RouteTreeNode};
pub use collector::RouteCollector;
pub use current::CurrentRoute;
pub use file::FileRoutesProvider;
pub use group::{Group, GroupBuilder, RouteItem};
pub use matching::{Arguments, MatchingResult, UrlMatcher};
pub use provider::{ArrayRoutesProvider, RoutesProvider};
pub use route::{Route, RouteBuilder};
