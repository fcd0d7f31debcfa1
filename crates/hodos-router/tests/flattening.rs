//! Flattening behavior of the route collection, exercised through the public API.

use hodos_core::{HodosError, MiddlewareDefinition};
use hodos_router::{
    ArrayRoutesProvider, FileRoutesProvider, Group, Route, RouteCollection, RouteCollector,
    RouteItem, RouteTreeNode,
};
use http::Method;
use proptest::prelude::*;
use std::io::Write;

fn named(name: &str) -> MiddlewareDefinition {
    MiddlewareDefinition::named(name.to_string())
}

fn collection_of(item: impl Into<RouteItem>) -> RouteCollection {
    let mut collector = RouteCollector::new();
    collector.add_route(item);
    RouteCollection::new(&collector).unwrap()
}

#[test]
fn test_api_v1_users_scenario() {
    let v1 = Group::builder("/v1")
        .routes([Route::get("/users")
            .name("api-v1-users")
            .action(named("UserController::index"))])
        .build()
        .unwrap();
    let api = Group::builder("/api")
        .middleware(named("Auth"))
        .routes([v1])
        .build()
        .unwrap();

    let collection = collection_of(api);
    let route = collection.route("api-v1-users").unwrap();

    assert_eq!(route.pattern(), "/api/v1/users");
    assert_eq!(route.name(), "api-v1-users");
    assert_eq!(
        route.enabled_middlewares(),
        [named("Auth"), named("UserController::index")]
    );
}

#[test]
fn test_route_disables_inherited_middleware() {
    let group = Group::create()
        .middleware(named("a"))
        .middleware(named("b"))
        .middleware(named("c"))
        .routes([Route::get("/x").name("x").disable_middleware(named("b"))])
        .build()
        .unwrap();

    let collection = collection_of(group);
    assert_eq!(
        collection.route("x").unwrap().enabled_middlewares(),
        [named("a"), named("c")]
    );
}

#[test]
fn test_group_disable_only_affects_its_subtree() {
    let quiet = Group::builder("/quiet")
        .disable_middleware(named("log"))
        .routes([Route::get("/a").name("quiet")])
        .build()
        .unwrap();
    let root = Group::create()
        .middleware(named("log"))
        .routes([
            RouteItem::from(quiet),
            RouteItem::from(Route::get("/b").name("loud")),
        ])
        .build()
        .unwrap();

    let collection = collection_of(root);
    assert!(collection.route("quiet").unwrap().enabled_middlewares().is_empty());
    assert_eq!(
        collection.route("loud").unwrap().enabled_middlewares(),
        [named("log")]
    );
}

#[test]
fn test_override_keeps_first_position() {
    let mut collector = RouteCollector::new();
    collector
        .add_route(Route::get("/first").name("home"))
        .add_route(Route::get("/other").name("other"))
        .add_resource(ArrayRoutesProvider::new([Route::get("/replaced")
            .name("home")
            .override_existing()]));

    let collection = RouteCollection::new(&collector).unwrap();
    let patterns: Vec<_> = collection.routes().map(|route| route.pattern()).collect();
    assert_eq!(patterns, ["/replaced", "/other"]);
}

#[test]
fn test_name_collision_without_override() {
    let mut collector = RouteCollector::new();
    collector
        .add_route(Route::get("/a").name("dup"))
        .add_route(Route::post("/b").name("dup"));

    let err = RouteCollection::new(&collector).unwrap_err();
    assert!(matches!(err, HodosError::DuplicateRouteName { .. }));
}

#[test]
fn test_cors_single_preflight_per_endpoint() {
    let group = Group::create()
        .with_cors(named("cors"))
        .routes([
            Route::get("/info").name("info"),
            Route::get("/info").name("info-legacy"),
        ])
        .build()
        .unwrap();

    let collection = collection_of(group);
    let preflights: Vec<_> = collection
        .routes()
        .filter(|route| route.http_methods().contains(&Method::OPTIONS))
        .collect();
    assert_eq!(preflights.len(), 1);
    assert_eq!(preflights[0].pattern(), "/info");
    assert_eq!(preflights[0].enabled_middlewares(), [named("cors")]);
}

#[test]
fn test_cors_suppressed_by_explicit_options() {
    let group = Group::create()
        .with_cors(named("cors"))
        .routes([
            Route::get("/info").name("info"),
            Route::get("/info").name("info-legacy"),
            Route::options("/info").name("info-options"),
        ])
        .build()
        .unwrap();

    let collection = collection_of(group);
    let preflights: Vec<_> = collection
        .routes()
        .filter(|route| route.http_methods().contains(&Method::OPTIONS))
        .map(|route| route.name().to_string())
        .collect();
    assert_eq!(preflights, ["info-options"]);
}

fn cors_info_group() -> Group {
    Group::create()
        .with_cors(named("cors"))
        .routes([Route::get("/info").name("info")])
        .build()
        .unwrap()
}

#[test]
fn test_named_options_route_after_cors_group_replaces_preflight() {
    let mut collector = RouteCollector::new();
    collector
        .add_route(cors_info_group())
        .add_route(Route::options("/info").name("info-options"));

    let collection = RouteCollection::new(&collector).unwrap();
    let preflights: Vec<_> = collection
        .routes()
        .filter(|route| route.http_methods().contains(&Method::OPTIONS))
        .map(|route| route.name().to_string())
        .collect();
    assert_eq!(preflights, ["info-options"]);
    assert!(!collection.has_route("OPTIONS /info"));
    assert!(!collection
        .route_tree()
        .contains(&RouteTreeNode::Route("OPTIONS /info".into())));
}

#[test]
fn test_unnamed_options_route_after_cors_group_replaces_preflight() {
    let mut collector = RouteCollector::new();
    collector
        .add_route(cors_info_group())
        .add_route(Route::options("/info"));

    let collection = RouteCollection::new(&collector).unwrap();
    let names: Vec<_> = collection.routes().map(|route| route.name()).collect();
    assert_eq!(names, ["info", "OPTIONS /info"]);

    let options = collection.route("OPTIONS /info").unwrap();
    assert!(options.enabled_middlewares().is_empty());
}

#[test]
fn test_routes_from_file_resource() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("routes.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(
        br#"
[[routes]]
type = "group"
prefix = "/blog"
name_prefix = "blog/"
middleware = ["auth"]

[[routes.routes]]
type = "route"
methods = ["GET"]
pattern = "/{slug}"
name = "post"
action = "posts.view"
"#,
    )
    .unwrap();

    let mut collector = RouteCollector::new();
    collector.add_resource(FileRoutesProvider::new(&path));
    let collection = RouteCollection::new(&collector).unwrap();

    let post = collection.route("blog/post").unwrap();
    assert_eq!(post.pattern(), "/blog/{slug}");
    assert_eq!(post.enabled_middlewares(), [named("auth"), named("posts.view")]);
}

#[test]
fn test_shared_route_value_in_two_groups() {
    let shared = Route::get("/status").name("status").to_route();
    let a = Group::builder("/a")
        .name_prefix("a/")
        .routes([shared.clone()])
        .build()
        .unwrap();
    let b = Group::builder("/b")
        .name_prefix("b/")
        .routes([shared.clone()])
        .build()
        .unwrap();

    let mut collector = RouteCollector::new();
    collector.add_routes([a, b]);
    let collection = RouteCollection::new(&collector).unwrap();

    assert_eq!(collection.route("a/status").unwrap().pattern(), "/a/status");
    assert_eq!(collection.route("b/status").unwrap().pattern(), "/b/status");
    assert_eq!(shared.pattern(), "/status");
}

fn segment() -> impl Strategy<Value = String> {
    "(/[a-z{}]{0,6}){0,3}"
}

fn middleware_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,5}", 0..4)
}

proptest! {
    #[test]
    fn prop_prefix_is_plain_concatenation(outer in segment(), inner in segment(), pattern in segment()) {
        let inner_group = Group::builder(inner.clone())
            .routes([Route::get(pattern.clone()).name("leaf")])
            .build()
            .unwrap();
        let outer_group = Group::builder(outer.clone())
            .routes([inner_group])
            .build()
            .unwrap();

        let collection = collection_of(outer_group);
        let expected = format!("{outer}{inner}{pattern}");
        prop_assert_eq!(collection.route("leaf").unwrap().pattern(), expected.as_str());
    }

    #[test]
    fn prop_inherited_middleware_precedes_local(inherited in middleware_names(), local in middleware_names()) {
        let mut route = Route::get("/").name("leaf");
        for name in &local {
            route = route.middleware(named(name));
        }
        let mut group = Group::create();
        for name in &inherited {
            group = group.middleware(named(name));
        }
        let group = group.routes([route]).build().unwrap();

        let collection = collection_of(group);
        let expected: Vec<_> = inherited.iter().chain(local.iter()).map(|name| named(name)).collect();
        prop_assert_eq!(collection.route("leaf").unwrap().enabled_middlewares(), expected.as_slice());
    }
}
