//! # Hodos Middleware
//!
//! Turns middleware definitions into a running chain and routes requests
//! into it.
//!
//! ```text
//! Request → Router ──match──→ MiddlewareDispatcher → MiddlewareStack
//!              │                                        │
//!              │                      m1 → m2 → … → action
//!              │                                        │
//!              └──no match──→ next handler ←── fallback ┘
//! ```
//!
//! - [`MiddlewareFactory`] resolves a [`MiddlewareDefinition`] into a
//!   [`Middleware`], using the service container where needed
//! - [`MiddlewareStack`] nests resolved middleware around a fallback handler
//! - [`MiddlewareDispatcher`] builds and caches the stack for a definition list
//! - [`Router`] is the middleware that matches a request and dispatches the
//!   matched route's middleware
//!
//! [`MiddlewareDefinition`]: hodos_core::MiddlewareDefinition
//! [`Middleware`]: hodos_core::Middleware

#![doc(html_root_url = "https://docs.rs/hodos-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod dispatcher;
mod factory;
mod method_failure;
mod router;
mod stack;

pub use action::ActionCaller;
pub use dispatcher::MiddlewareDispatcher;
pub use factory::MiddlewareFactory;
pub use method_failure::MethodFailureResponder;
pub use router::Router;
pub use stack::MiddlewareStack;
