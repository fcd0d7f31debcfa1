//! Middleware definitions.
//!
//! Routes and groups do not hold middleware directly. They hold
//! [`MiddlewareDefinition`]s, which a middleware factory turns into live
//! [`Middleware`] objects the first time a request reaches them. A definition
//! is one of:
//!
//! - [`ClassRef`] - a middleware type, looked up in the container or
//!   constructed through [`Injectable`]
//! - [`ActionRef`] - a method on a controller type, instantiated per call
//! - [`CallableRef`] - an async closure receiving the request and [`Next`]
//! - an already-built [`Middleware`] instance
//!
//! Equality lets a route disable a middleware it inherited from a group.
//! Classes compare by type name, actions by controller and method, and
//! instances by [`Middleware::name`]. Only callables compare by identity.

use crate::di::{Container, Injectable, InjectionError};
use crate::error::HodosResult;
use crate::handler::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Builds a middleware from a container.
pub type MiddlewareConstructor = fn(&Container) -> Result<Arc<dyn Middleware>, InjectionError>;

type CallableFn = dyn Fn(Request, Next) -> BoxFuture<'static, HodosResult<ActionOutcome>> + Send + Sync;

/// What an action or callable produced.
pub enum ActionOutcome {
    /// A final response.
    Response(Response),
    /// A middleware to which the request is handed on, with the given continuation.
    Delegate {
        /// The middleware to run.
        middleware: Arc<dyn Middleware>,
        /// The request to pass along.
        request: Request,
        /// The continuation to give it.
        next: Next,
    },
}

impl ActionOutcome {
    /// Hands the request to `middleware` instead of answering directly.
    pub fn delegate(middleware: Arc<dyn Middleware>, request: Request, next: Next) -> Self {
        Self::Delegate {
            middleware,
            request,
            next,
        }
    }
}

impl From<Response> for ActionOutcome {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response(response) => f
                .debug_tuple("Response")
                .field(&response.status())
                .finish(),
            Self::Delegate { middleware, .. } => f
                .debug_struct("Delegate")
                .field("middleware", &middleware.name())
                .finish_non_exhaustive(),
        }
    }
}

/// Reference to a middleware type.
#[derive(Clone)]
pub struct ClassRef {
    name: Cow<'static, str>,
    constructor: Option<MiddlewareConstructor>,
}

impl ClassRef {
    /// The name the middleware is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constructor used when nothing is registered under [`name`](Self::name).
    pub fn constructor(&self) -> Option<MiddlewareConstructor> {
        self.constructor
    }
}

fn construct<M: Middleware + Injectable>(
    container: &Container,
) -> Result<Arc<dyn Middleware>, InjectionError> {
    M::inject(container).map(|middleware| Arc::new(middleware) as Arc<dyn Middleware>)
}

trait ActionMethod: Send + Sync {
    fn call(
        &self,
        container: &Container,
        request: Request,
        next: Next,
    ) -> BoxFuture<'static, HodosResult<ActionOutcome>>;
}

struct BoundAction<C, F> {
    func: F,
    _controller: PhantomData<fn() -> C>,
}

impl<C, F, Fut, O> ActionMethod for BoundAction<C, F>
where
    C: Injectable,
    F: Fn(Arc<C>, Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HodosResult<O>> + Send + 'static,
    O: Into<ActionOutcome> + 'static,
{
    fn call(
        &self,
        container: &Container,
        request: Request,
        next: Next,
    ) -> BoxFuture<'static, HodosResult<ActionOutcome>> {
        match container.instantiate::<C>() {
            Ok(controller) => {
                let fut = (self.func)(controller, request, next);
                Box::pin(async move { fut.await.map(Into::into) })
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}

/// Reference to a method on a controller type.
#[derive(Clone)]
pub struct ActionRef {
    class: &'static str,
    method: Cow<'static, str>,
    target: Arc<dyn ActionMethod>,
}

impl ActionRef {
    /// Type name of the controller.
    pub fn class(&self) -> &str {
        self.class
    }

    /// Method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Instantiates the controller from `container` and calls the method.
    pub fn invoke(
        &self,
        container: &Container,
        request: Request,
        next: Next,
    ) -> BoxFuture<'static, HodosResult<ActionOutcome>> {
        self.target.call(container, request, next)
    }
}

/// Reference to an async closure.
#[derive(Clone)]
pub struct CallableRef {
    name: Cow<'static, str>,
    func: Arc<CallableFn>,
}

impl CallableRef {
    /// Label used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the closure.
    pub fn invoke(&self, request: Request, next: Next) -> BoxFuture<'static, HodosResult<ActionOutcome>> {
        (self.func)(request, next)
    }
}

/// A reference to a middleware, resolved lazily by a factory.
#[derive(Clone)]
pub enum MiddlewareDefinition {
    /// A middleware type.
    Class(ClassRef),
    /// A controller method.
    Action(ActionRef),
    /// An async closure.
    Callable(CallableRef),
    /// A ready-made instance.
    ///
    /// Instances with the same [`Middleware::name`] are equal, so disabling
    /// one disables every instance sharing that name.
    Instance(Arc<dyn Middleware>),
}

impl MiddlewareDefinition {
    /// References middleware type `M`.
    ///
    /// Resolution first looks for an instance registered under the type name
    /// and otherwise builds one with [`Injectable::inject`].
    pub fn class<M: Middleware + Injectable>() -> Self {
        Self::Class(ClassRef {
            name: Cow::Borrowed(std::any::type_name::<M>()),
            constructor: Some(construct::<M>),
        })
    }

    /// References a middleware registered in the container under `name`.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Class(ClassRef {
            name: name.into(),
            constructor: None,
        })
    }

    /// References method `method` of controller type `C`.
    ///
    /// The controller is instantiated from the container on every call.
    ///
    /// ```
    /// use hodos_core::{HodosResult, MiddlewareDefinition, Next, Request, Response, ResponseExt};
    /// use hodos_core::di::{Container, Injectable, InjectionError};
    /// use http::StatusCode;
    /// use std::sync::Arc;
    ///
    /// struct SiteController;
    ///
    /// impl Injectable for SiteController {
    ///     fn inject(_: &Container) -> Result<Self, InjectionError> {
    ///         Ok(Self)
    ///     }
    /// }
    ///
    /// let index = MiddlewareDefinition::action("index", |_c: Arc<SiteController>, _req: Request, _next: Next| async {
    ///     HodosResult::Ok(Response::text(StatusCode::OK, "home"))
    /// });
    /// assert!(index.to_string().ends_with("SiteController::index"));
    /// ```
    pub fn action<C, F, Fut, O>(method: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        C: Injectable,
        F: Fn(Arc<C>, Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HodosResult<O>> + Send + 'static,
        O: Into<ActionOutcome> + 'static,
    {
        Self::Action(ActionRef {
            class: std::any::type_name::<C>(),
            method: method.into(),
            target: Arc::new(BoundAction {
                func,
                _controller: PhantomData,
            }),
        })
    }

    /// Wraps an async closure.
    pub fn callable<F, Fut, O>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HodosResult<O>> + Send + 'static,
        O: Into<ActionOutcome> + 'static,
    {
        let func: Arc<CallableFn> = Arc::new(
            move |request: Request, next: Next| -> BoxFuture<'static, HodosResult<ActionOutcome>> {
                let fut = func(request, next);
                Box::pin(async move { fut.await.map(Into::into) })
            },
        );
        Self::Callable(CallableRef {
            name: name.into(),
            func,
        })
    }

    /// Wraps an existing middleware instance.
    pub fn instance(middleware: impl Middleware) -> Self {
        Self::Instance(Arc::new(middleware))
    }

    /// Short label of the definition kind, used as a metric label.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Action(_) => "action",
            Self::Callable(_) => "callable",
            Self::Instance(_) => "instance",
        }
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareDefinition {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Self::Instance(middleware)
    }
}

impl PartialEq for MiddlewareDefinition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) => a.name == b.name,
            (Self::Action(a), Self::Action(b)) => a.class == b.class && a.method == b.method,
            (Self::Callable(a), Self::Callable(b)) => {
                Arc::as_ptr(&a.func).cast::<()>() == Arc::as_ptr(&b.func).cast::<()>()
            }
            (Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(a, b) || a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for MiddlewareDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.write_str(&class.name),
            Self::Action(action) => write!(f, "{}::{}", action.class, action.method),
            Self::Callable(callable) => write!(f, "callable({})", callable.name),
            Self::Instance(middleware) => write!(f, "instance({})", middleware.name()),
        }
    }
}

impl fmt::Debug for MiddlewareDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", self.kind())
    }
}
