//! Configuration for the ktscan sensor.
//!
//! Two configuration surfaces exist: the host property bag (string-valued
//! tunables handed to the sensor by the scanning host) and an optional
//! `ktscan.toml` project file used by the standalone CLI. Invalid tunable
//! values are never fatal: they log a warning and fall back to defaults.

#![warn(missing_docs)]

mod error;
mod project;
mod settings;

pub use error::ConfigError;
pub use project::{load_project_config, load_project_config_from_str, ProjectConfig};
pub use settings::{
    SensorSettings, PROP_CACHE_ENABLED, PROP_FAIL_FAST, PROP_SKIP_UNCHANGED, PROP_THREADS,
};
