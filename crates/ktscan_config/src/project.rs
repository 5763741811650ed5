//! `ktscan.toml` project file loading and validation.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Name of the project configuration file.
const CONFIG_FILE: &str = "ktscan.toml";

/// A parsed `ktscan.toml` project configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// The `[project]` section.
    pub project: ProjectSection,
    /// The `[analysis]` section.
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// The `[rules]` section.
    #[serde(default)]
    pub rules: RulesSection,
}

/// Project identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Project key used as the module prefix of file keys.
    pub key: String,
    /// Source directories to scan, relative to the project root.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

/// Analysis tunables mirrored onto [`SensorSettings`](crate::SensorSettings).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSection {
    /// Parser worker-thread count override.
    pub threads: Option<usize>,
    /// Whether to skip files proven unchanged since the previous run.
    pub incremental: Option<bool>,
    /// Whether to keep a run-to-run content hash cache.
    pub cache: Option<bool>,
}

/// Rule selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesSection {
    /// Rule names to suppress.
    #[serde(default)]
    pub allow: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec!["src".to_string()]
}

/// Loads and validates `ktscan.toml` from a project directory.
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_project_config_from_str(&content)
}

/// Parses and validates a `ktscan.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_project_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.key.is_empty() {
        return Err(ConfigError::MissingField("project.key".to_string()));
    }
    if let Some(0) = config.analysis.threads {
        return Err(ConfigError::Validation(
            "analysis.threads must be at least 1".to_string(),
        ));
    }
    Ok(())
}
