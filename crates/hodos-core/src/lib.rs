//! # Hodos Core
//!
//! Core types and traits for the Hodos routing engine.
//!
//! This crate provides the foundational types shared by the router and the
//! middleware dispatcher:
//!
//! - [`Request`] / [`Response`] - HTTP message types flowing through the chain
//! - [`RequestHandler`] and [`Middleware`] - the two processing capabilities
//! - [`MiddlewareDefinition`] - a not-yet-resolved reference to a middleware
//! - [`Container`] - the type-keyed service container used for resolution
//! - [`HodosError`] - the error type used throughout Hodos

#![doc(html_root_url = "https://docs.rs/hodos-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod definition;
pub mod di;
mod error;
mod handler;
mod types;

pub use definition::{ActionOutcome, ActionRef, CallableRef, ClassRef, MiddlewareDefinition};
pub use di::{Container, Injectable, InjectionError};
pub use error::{ErrorCategory, HodosError, HodosResult};
pub use handler::{BoxFuture, FnHandler, FnMiddleware, HandlerResult, Middleware, Next, RequestHandler};
pub use types::{Request, Response, ResponseExt};
