//! Wiring a router from configuration.

use hodos_config::{HodosConfig, RouterConfig};
use hodos_core::{HodosError, HodosResult};
use hodos_middleware::{MiddlewareDispatcher, MiddlewareFactory, Router};
use hodos_router::{FileRoutesProvider, RouteCollector, UrlMatcher};
use hodos_telemetry::{init_logging, init_metrics, LogConfig, MetricsConfig, TelemetryResult};

/// Installs logging and metrics as configured.
///
/// # Errors
///
/// Returns `TelemetryError` if a subscriber or recorder is already installed
/// or the log filter is invalid.
pub fn init_telemetry(config: &HodosConfig) -> TelemetryResult<()> {
    init_logging(&LogConfig::from(&config.logging))?;
    init_metrics(&MetricsConfig::from(&config.metrics))
}

/// Creates a collector with one file resource per configured path.
///
/// Missing resources fail with `ResourceNotFound` when
/// `strict_resources` is set and are skipped with a warning otherwise. The
/// files themselves are read when the collection is built.
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing resource in strict mode.
pub fn collector_from_config(config: &RouterConfig) -> HodosResult<RouteCollector> {
    let mut collector = RouteCollector::new();

    for path in &config.resources {
        if !path.exists() {
            if config.strict_resources {
                return Err(HodosError::ResourceNotFound { path: path.clone() });
            }
            tracing::warn!(path = %path.display(), "route resource not found, skipping");
            continue;
        }
        collector.add_resource(FileRoutesProvider::new(path));
    }

    Ok(collector)
}

/// Creates the routing middleware for `matcher`.
///
/// Method failures are passed on to the next handler unless
/// `handle_method_failure` is set.
pub fn router_from_config(
    config: &RouterConfig,
    matcher: impl UrlMatcher,
    factory: MiddlewareFactory,
) -> Router {
    let router = Router::new(matcher, MiddlewareDispatcher::new(factory));
    if config.handle_method_failure {
        router
    } else {
        router.ignore_method_failure()
    }
}
