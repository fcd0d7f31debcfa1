//! Typed configuration for Hodos.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`PREFIX__SECTION__KEY`)
//! - Strict validation (fails on unknown fields)
//!
//! # Example
//!
//! ```no_run
//! use hodos_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hodos_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_file("hodos.toml")?
//!     .with_env_prefix("HODOS")
//!     .load()?;
//!
//! for resource in &config.router.resources {
//!     println!("routes from {}", resource.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [router]
//! resources = ["routes/"]
//! handle_method_failure = true
//! strict_resources = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! ```

#![doc(html_root_url = "https://docs.rs/hodos-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HodosConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, MetricsSection, RouterConfig};
