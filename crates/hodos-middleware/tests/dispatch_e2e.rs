//! End-to-end routing and dispatch tests.
//!
//! A route collection is flattened, matched by a small segment matcher and
//! dispatched through the router middleware, the way a host application
//! wires Hodos together.

use bytes::Bytes;
use hodos_core::{
    ActionOutcome, BoxFuture, Container, FnMiddleware, HandlerResult, HodosError, HodosResult,
    Injectable, InjectionError, Middleware, MiddlewareDefinition, Next, Request, RequestHandler,
    Response, ResponseExt,
};
use hodos_middleware::{MiddlewareDispatcher, MiddlewareFactory, MiddlewareStack, Router};
use hodos_router::{
    Arguments, CurrentRoute, Group, MatchingResult, Route, RouteCollection, RouteCollector,
};
use http::header::ALLOW;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn not_found() -> Next {
    Next::from_fn(|_req| async { HodosResult::Ok(Response::empty(StatusCode::NOT_FOUND)) })
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Matches `{name}` placeholders against single path segments.
fn match_pattern(pattern: &str, path: &str) -> Option<Arguments> {
    let pattern: Vec<_> = pattern.split('/').collect();
    let path: Vec<_> = path.split('/').collect();
    if pattern.len() != path.len() {
        return None;
    }

    let mut arguments = Arguments::new();
    for (expected, actual) in pattern.iter().zip(&path) {
        if let Some(name) = expected.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            arguments.push(name, *actual);
        } else if expected != actual {
            return None;
        }
    }
    Some(arguments)
}

fn segment_matcher(collection: Arc<RouteCollection>) -> impl Fn(&Request) -> MatchingResult {
    move |request: &Request| {
        let mut allowed = Vec::new();
        for route in collection.routes() {
            let Some(arguments) = match_pattern(route.pattern(), request.uri().path()) else {
                continue;
            };
            if route.http_methods().contains(request.method()) {
                return MatchingResult::from_success(Arc::clone(route), arguments);
            }
            allowed.extend(route.http_methods().iter().cloned());
        }
        MatchingResult::from_failure(allowed)
    }
}

struct Auth;

impl Injectable for Auth {
    fn inject(_: &Container) -> Result<Self, InjectionError> {
        Ok(Self)
    }
}

impl Middleware for Auth {
    fn name(&self) -> &str {
        "auth"
    }

    fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult> {
        Box::pin(async move {
            if request.headers().contains_key("authorization") {
                next.run(request).await
            } else {
                Ok(Response::empty(StatusCode::UNAUTHORIZED))
            }
        })
    }
}

static NEVER_BUILT: AtomicUsize = AtomicUsize::new(0);

struct Unreachable;

impl Injectable for Unreachable {
    fn inject(_: &Container) -> Result<Self, InjectionError> {
        NEVER_BUILT.fetch_add(1, Ordering::SeqCst);
        Ok(Self)
    }
}

impl Middleware for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn process(&self, request: Request, next: Next) -> BoxFuture<'_, HandlerResult> {
        Box::pin(next.run(request))
    }
}

struct UserController {
    greeting: Arc<String>,
}

impl Injectable for UserController {
    fn inject(container: &Container) -> Result<Self, InjectionError> {
        Ok(Self {
            greeting: container.resolve_required()?,
        })
    }
}

fn user_index() -> MiddlewareDefinition {
    MiddlewareDefinition::action(
        "index",
        |controller: Arc<UserController>, request: Request, _next: Next| async move {
            let current = request.extensions().get::<CurrentRoute>().cloned().unwrap_or_default();
            HodosResult::Ok(Response::text(
                StatusCode::OK,
                format!("{} from {}", controller.greeting, current.name().unwrap_or("?")),
            ))
        },
    )
}

fn container() -> Arc<Container> {
    let mut container = Container::new();
    container.register(Arc::new("hello".to_string()));
    Arc::new(container)
}

fn app(collector: &RouteCollector, container: Arc<Container>) -> Router {
    let collection = Arc::new(RouteCollection::new(collector).unwrap());
    Router::new(
        segment_matcher(collection),
        MiddlewareDispatcher::new(MiddlewareFactory::with_container(container)),
    )
}

#[tokio::test]
async fn test_short_circuit_skips_later_middleware() {
    let stack = MiddlewareStack::new(
        vec![
            MiddlewareDefinition::class::<Auth>(),
            MiddlewareDefinition::class::<Unreachable>(),
        ],
        MiddlewareFactory::with_container(container()),
        not_found().into_handler(),
    );

    let response = stack
        .handle(request(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(NEVER_BUILT.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_api_v1_users_end_to_end() {
    let v1 = Group::builder("/v1")
        .routes([Route::get("/users").name("api-v1-users").action(user_index())])
        .build()
        .unwrap();
    let api = Group::builder("/api")
        .middleware(MiddlewareDefinition::class::<Auth>())
        .routes([v1])
        .build()
        .unwrap();
    let mut collector = RouteCollector::new();
    collector.add_route(api);
    let router = app(&collector, container());

    let denied = router
        .process(request(Method::GET, "/api/v1/users"), not_found())
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let mut authorized = request(Method::GET, "/api/v1/users");
    authorized
        .headers_mut()
        .insert("authorization", "Bearer token".parse().unwrap());
    let response = router.process(authorized, not_found()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "hello from api-v1-users");

    let missing = router
        .process(request(Method::GET, "/api/v2/users"), not_found())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_method_failure_and_preflight() {
    let mut collector = RouteCollector::new();
    collector.add_route(
        Route::methods([Method::GET, Method::HEAD], "/users")
            .unwrap()
            .name("users")
            .action(user_index()),
    );
    let router = app(&collector, container());

    let response = router
        .process(request(Method::POST, "/users"), not_found())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, HEAD");

    let response = router
        .process(request(Method::OPTIONS, "/users"), not_found())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()[ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn test_arguments_reach_the_action() {
    let show = MiddlewareDefinition::callable("show", |request: Request, _next: Next| async move {
        let arguments = request.extensions().get::<Arguments>().cloned().unwrap_or_default();
        HodosResult::Ok(Response::text(StatusCode::OK, arguments.get_or("id", "none")))
    });
    let mut collector = RouteCollector::new();
    collector.add_route(Route::get("/users/{id}").name("user").action(show));
    let router = app(&collector, container());

    let response = router
        .process(request(Method::GET, "/users/42"), not_found())
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "42");
}

#[tokio::test]
async fn test_callable_delegates_to_middleware() {
    let teapot: Arc<dyn Middleware> = Arc::new(FnMiddleware::new(
        "teapot",
        |_req: Request, _next: Next| async {
            HodosResult::Ok(Response::empty(StatusCode::IM_A_TEAPOT))
        },
    ));
    let delegate = MiddlewareDefinition::callable("delegate", move |request: Request, next: Next| {
        let teapot = Arc::clone(&teapot);
        async move { HodosResult::Ok(ActionOutcome::delegate(teapot, request, next)) }
    });

    let mut collector = RouteCollector::new();
    collector.add_route(Route::get("/brew").name("brew").action(delegate));
    let router = app(&collector, container());

    let response = router
        .process(request(Method::GET, "/brew"), not_found())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn test_action_without_container_fails() {
    let mut collector = RouteCollector::new();
    collector.add_route(Route::get("/users").name("users").action(user_index()));
    let collection = Arc::new(RouteCollection::new(&collector).unwrap());
    let router = Router::new(
        segment_matcher(collection),
        MiddlewareDispatcher::new(MiddlewareFactory::new()),
    );

    let err = router
        .process(request(Method::GET, "/users"), not_found())
        .await
        .unwrap_err();
    assert!(matches!(err, HodosError::ContainerRequired { .. }));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_route_without_middleware_reports_empty_stack() {
    let mut collector = RouteCollector::new();
    collector.add_route(Route::get("/bare").name("bare"));
    let router = app(&collector, container());

    let err = router
        .process(request(Method::GET, "/bare"), not_found())
        .await
        .unwrap_err();
    assert!(matches!(err, HodosError::EmptyStack));
}
