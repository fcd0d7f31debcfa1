//! Logging and metrics for Hodos.
//!
//! - **Logging**: `tracing-subscriber` with JSON or pretty output, see [`logging`]
//! - **Metrics**: routing counters through the `metrics` facade with a
//!   Prometheus recorder, see [`metrics`]
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hodos_route_matches_total` | Counter | `outcome` | Routing outcomes |
//! | `hodos_routes_registered` | Gauge | - | Routes in the last built collection |
//! | `hodos_middleware_resolutions_total` | Counter | `kind` | Middleware definitions resolved |
//!
//! # Example
//!
//! ```rust,no_run
//! use hodos_telemetry::logging::{init_logging, LogConfig};
//! use hodos_telemetry::metrics::{init_metrics, MetricsConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! init_metrics(&MetricsConfig::default()).expect("metrics");
//! ```

#![doc(html_root_url = "https://docs.rs/hodos-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;
pub mod metrics;

pub use crate::error::TelemetryError;
pub use crate::logging::{init_logging, LogConfig};
pub use crate::metrics::{init_metrics, MetricsConfig, RouteMatchOutcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
