//! Routing metrics.
//!
//! Recording goes through the `metrics` facade, so the functions here are
//! no-ops until a recorder is installed with [`init_metrics`].
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `hodos_route_matches_total` | Counter | `outcome` |
//! | `hodos_routes_registered` | Gauge | - |
//! | `hodos_middleware_resolutions_total` | Counter | `kind` |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use ::metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Counter of routing outcomes.
pub const ROUTE_MATCHES_TOTAL: &str = "hodos_route_matches_total";

/// Gauge of routes in the most recently built collection.
pub const ROUTES_REGISTERED: &str = "hodos_routes_registered";

/// Counter of resolved middleware definitions.
pub const MIDDLEWARE_RESOLUTIONS_TOTAL: &str = "hodos_middleware_resolutions_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether to install the Prometheus recorder.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// How the routing middleware handled a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMatchOutcome {
    /// A route matched and was dispatched.
    Success,
    /// The path matched but the method did not.
    MethodNotAllowed,
    /// An `OPTIONS` request answered from the allowed methods.
    Preflight,
    /// Nothing matched.
    NotFound,
}

impl RouteMatchOutcome {
    /// Label value used for this outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Preflight => "preflight",
            Self::NotFound => "not_found",
        }
    }
}

/// Installs the Prometheus recorder.
///
/// The exporter is not bound to a socket. Use [`render_metrics`] to expose
/// the text format from the host application.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    let _ = METRICS_HANDLE.set(handle);

    register_metric_descriptions();
    Ok(())
}

/// Renders metrics in Prometheus format, or `None` before [`init_metrics`].
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        ROUTE_MATCHES_TOTAL,
        "Requests seen by the routing middleware, by outcome"
    );
    describe_gauge!(ROUTES_REGISTERED, "Routes in the flattened route collection");
    describe_counter!(
        MIDDLEWARE_RESOLUTIONS_TOTAL,
        "Middleware definitions resolved by the middleware factory"
    );
}

/// Records a routing outcome.
pub fn record_route_match(outcome: RouteMatchOutcome) {
    counter!(ROUTE_MATCHES_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Records the size of a freshly built route collection.
pub fn set_routes_registered(count: usize) {
    gauge!(ROUTES_REGISTERED).set(count as f64);
}

/// Records the resolution of a middleware definition of the given kind.
pub fn record_middleware_resolution(kind: &'static str) {
    counter!(MIDDLEWARE_RESOLUTIONS_TOTAL, "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert!(MetricsConfig::default().enabled);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(RouteMatchOutcome::Success.as_str(), "success");
        assert_eq!(
            RouteMatchOutcome::MethodNotAllowed.as_str(),
            "method_not_allowed"
        );
        assert_eq!(RouteMatchOutcome::Preflight.as_str(), "preflight");
        assert_eq!(RouteMatchOutcome::NotFound.as_str(), "not_found");
    }

    #[test]
    fn test_record_functions_dont_panic() {
        record_route_match(RouteMatchOutcome::NotFound);
        set_routes_registered(12);
        record_middleware_resolution("class");
    }

    #[test]
    fn test_disabled_metrics() {
        let config = MetricsConfig { enabled: false };
        assert!(init_metrics(&config).is_ok());
    }
}
