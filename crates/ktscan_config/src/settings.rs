//! Sensor tunables resolved from the host property bag.

use ktscan_diagnostics::EventLog;
use std::collections::HashMap;

/// Property controlling the parser worker-thread count.
pub const PROP_THREADS: &str = "ktscan.internal.threads";

/// Property (host capability) enabling skipping of unchanged files.
pub const PROP_SKIP_UNCHANGED: &str = "ktscan.skipUnchanged";

/// Property (host capability) enabling the run-to-run content hash cache.
pub const PROP_CACHE_ENABLED: &str = "ktscan.cache.enabled";

/// Property making parse failures surface as sensor-level errors.
pub const PROP_FAIL_FAST: &str = "ktscan.failFast";

/// Default parser worker-thread count.
const DEFAULT_THREADS: usize = 1;

/// Resolved sensor settings for one analysis run.
///
/// Built from the host property bag; malformed values log a warning and
/// fall back to the defaults rather than failing the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorSettings {
    /// Whether the host requested incremental analysis (skip unchanged files).
    pub incremental: bool,
    /// Whether the run-to-run content hash cache is available.
    pub cache_enabled: bool,
    /// Worker-thread count for the parse phase. Always at least 1.
    pub threads: usize,
    /// Whether parse failures surface as sensor-level errors in the report.
    pub fail_fast: bool,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            incremental: false,
            cache_enabled: false,
            threads: DEFAULT_THREADS,
            fail_fast: false,
        }
    }
}

impl SensorSettings {
    /// Resolves settings from the host property bag.
    ///
    /// Unknown properties are ignored. Values that fail to parse log a
    /// warning through `log` and keep the default.
    pub fn from_properties(properties: &HashMap<String, String>, log: &EventLog) -> Self {
        let defaults = Self::default();
        Self {
            incremental: parse_bool(properties, PROP_SKIP_UNCHANGED, defaults.incremental, log),
            cache_enabled: parse_bool(properties, PROP_CACHE_ENABLED, defaults.cache_enabled, log),
            threads: parse_threads(properties, defaults.threads, log),
            fail_fast: parse_bool(properties, PROP_FAIL_FAST, defaults.fail_fast, log),
        }
    }
}

fn parse_bool(
    properties: &HashMap<String, String>,
    key: &str,
    default: bool,
    log: &EventLog,
) -> bool {
    match properties.get(key) {
        None => default,
        Some(raw) => match raw.trim() {
            "true" => true,
            "false" => false,
            other => {
                log.warn(format!(
                    "Invalid value for '{key}': '{other}', using default {default}"
                ));
                default
            }
        },
    }
}

fn parse_threads(properties: &HashMap<String, String>, default: usize, log: &EventLog) -> usize {
    match properties.get(PROP_THREADS) {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => n,
            _ => {
                log.warn(format!(
                    "Invalid value for '{PROP_THREADS}': '{raw}', using default {default}"
                ));
                default
            }
        },
    }
}
