//! # Hodos
//!
//! **URL routing and middleware dispatch**
//!
//! Hodos turns a tree of route groups into a flat, named route collection
//! and runs the middleware of the matched route around the rest of the
//! application:
//!
//! - **Route and group builders** with inherited prefixes, hosts and
//!   middleware, and per-route or per-group disabling
//! - **Flattening** into a `RouteCollection` with name collision checks,
//!   overrides and synthesized CORS preflight routes
//! - **Lazy middleware resolution** from types, controller actions, closures
//!   or instances through a service container
//! - **A routing middleware** answering method failures with `405` or `204`
//!   and an `Allow` header
//!
//! ## Quick Start
//!
//! ```rust
//! use hodos::prelude::*;
//! use http::StatusCode;
//!
//! let users = MiddlewareDefinition::callable("users", |_req: Request, _next: Next| async {
//!     HodosResult::Ok(Response::text(StatusCode::OK, "users"))
//! });
//!
//! let api = Group::builder("/api")
//!     .name_prefix("api/")
//!     .routes([Route::get("/users").name("users").action(users)])
//!     .build()?;
//!
//! let mut collector = RouteCollector::new();
//! collector.add_route(api);
//! let collection = RouteCollection::new(&collector)?;
//!
//! assert_eq!(collection.route("api/users")?.pattern(), "/api/users");
//! # Ok::<(), HodosError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RouteCollector ──flatten──→ RouteCollection ──→ UrlMatcher (host supplied)
//!                                                      │
//! Request → Router ──match──→ MiddlewareDispatcher → m1 → … → action
//!              └──no match──→ next handler
//! ```

#![doc(html_root_url = "https://docs.rs/hodos/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bootstrap;

// Re-export core types
pub use hodos_core as core;

// Re-export routing types
pub use hodos_router as router;

// Re-export middleware types
pub use hodos_middleware as middleware;

// Re-export telemetry
pub use hodos_telemetry as telemetry;

// Re-export configuration
pub use hodos_config as config;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hodos::prelude::*;
/// ```
pub mod prelude {
    pub use hodos_core::{
        ActionOutcome, Container, FnHandler, FnMiddleware, HandlerResult, HodosError, HodosResult,
        Injectable, InjectionError, Middleware, MiddlewareDefinition, Next, Request,
        RequestHandler, Response, ResponseExt,
    };

    pub use hodos_router::{
        Arguments, CurrentRoute, Group, MatchingResult, Route, RouteCollection, RouteCollector,
        UrlMatcher,
    };

    pub use hodos_middleware::{MiddlewareDispatcher, MiddlewareFactory, Router};

    pub use hodos_config::{ConfigLoader, HodosConfig};
}
