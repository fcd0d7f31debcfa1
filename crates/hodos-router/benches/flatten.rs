//! Collection flattening benchmarks.
//!
//! Run with: `cargo bench -p hodos-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hodos_core::MiddlewareDefinition;
use hodos_router::{Group, Route, RouteCollection, RouteCollector, RouteItem};

fn build_collector(num_routes: usize) -> RouteCollector {
    let mut collector = RouteCollector::new();
    collector.middleware(MiddlewareDefinition::named("session"));

    // Flat routes
    for i in 0..num_routes / 3 {
        collector.add_route(
            Route::get(format!("/resource{i}"))
                .name(format!("resource{i}"))
                .action(MiddlewareDefinition::named("ResourceController::index")),
        );
    }

    // One group level
    let items: Vec<RouteItem> = (0..num_routes / 3)
        .map(|i| {
            Route::get(format!("/resource{i}/{{id}}"))
                .name(format!("view{i}"))
                .action(MiddlewareDefinition::named("ResourceController::view"))
                .into()
        })
        .collect();
    collector.add_route(
        Group::builder("/api/v1")
            .name_prefix("api/")
            .middleware(MiddlewareDefinition::named("auth"))
            .routes(items)
            .build()
            .expect("valid group"),
    );

    // Nested groups with CORS
    let nested: Vec<RouteItem> = (0..num_routes / 3)
        .map(|i| {
            Route::methods([http::Method::GET, http::Method::POST], format!("/resource{i}/{{id}}"))
                .expect("methods")
                .name(format!("org{i}"))
                .into()
        })
        .collect();
    let inner = Group::builder("/{orgId}")
        .disable_middleware(MiddlewareDefinition::named("session"))
        .routes(nested)
        .build()
        .expect("valid group");
    collector.add_route(
        Group::builder("/org")
            .with_cors(MiddlewareDefinition::named("cors"))
            .routes([inner])
            .build()
            .expect("valid group"),
    );

    collector
}

fn bench_flatten(c: &mut Criterion) {
    let collector = build_collector(300);

    c.bench_function("flatten_300", |b| {
        b.iter(|| black_box(RouteCollection::new(&collector).expect("flatten")));
    });
}

fn bench_lookup(c: &mut Criterion) {
    let collection = RouteCollection::new(&build_collector(300)).expect("flatten");

    c.bench_function("lookup_by_name", |b| {
        b.iter(|| black_box(collection.route("api/view50").is_ok()));
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_scaling");

    for size in [30, 300, 3000] {
        let collector = build_collector(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &collector, |b, collector| {
            b.iter(|| black_box(RouteCollection::new(collector).expect("flatten")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_lookup, bench_scaling);
criterion_main!(benches);
