//! `ktscan analyze` — one sensor run over a project directory.
//!
//! The pipeline:
//!
//! 1. Resolve the project directory and load `ktscan.toml` if present
//! 2. Discover `.kt`/`.kts` files under the configured source directories
//! 3. Open the on-disk cache (previous run becomes the snapshot)
//! 4. Run the sensor
//! 5. Render findings and per-file failures
//! 6. Commit the new cache image

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ktscan_analysis::{register_builtin_rules, FileSpec, KotlinSensor, RuleRegistry};
use ktscan_cache::{AnalysisCache, DiskCache};
use ktscan_config::{ProjectConfig, SensorSettings};
use ktscan_diagnostics::{EventLog, Severity};
use ktscan_source::{FileKey, InputStatus};

use crate::{AnalyzeArgs, GlobalArgs, ReportFormat};

/// Directory the cache image lives in, relative to the project root.
pub(crate) const CACHE_DIR: &str = ".ktscan-cache";

/// Runs the `ktscan analyze` command.
///
/// Returns exit code 0 on a clean run and 1 when `--fail-fast` is set and
/// a file could not be read or parsed.
pub fn run(args: &AnalyzeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = PathBuf::from(args.path.as_deref().unwrap_or("."));
    let config = load_optional_config(&project_dir)?;

    let settings = resolve_settings(args, config.as_ref());
    let module_key = config
        .as_ref()
        .map(|c| c.project.key.clone())
        .unwrap_or_else(|| module_key_from_dir(&project_dir));

    let specs = discover_kotlin_files(&project_dir, &source_dirs(config.as_ref()), &module_key)?;
    if specs.is_empty() {
        if !global.quiet {
            eprintln!(
                "warning: no Kotlin source files found in {}",
                project_dir.display()
            );
        }
        return Ok(0);
    }

    let mut allow = args.allow.clone();
    if let Some(config) = &config {
        allow.extend(config.rules.allow.iter().cloned());
    }
    let mut registry = RuleRegistry::new().with_allow_list(allow);
    register_builtin_rules(&mut registry);

    let disk = settings
        .cache_enabled
        .then(|| Arc::new(DiskCache::open(&project_dir.join(CACHE_DIR))));
    let cache = match &disk {
        Some(disk) => AnalysisCache::new(Some(disk.clone()), disk.clone(), true),
        None => AnalysisCache::disabled(),
    };

    let log = EventLog::new();
    let sensor = KotlinSensor::new(settings, registry);
    let report = sensor.execute(&specs, &cache, &log);

    if let Some(disk) = &disk {
        if let Err(e) = disk.commit() {
            eprintln!("warning: could not persist analysis cache: {e}");
        }
    }

    render(&report, &log, args.format, global);
    Ok(if report.failed { 1 } else { 0 })
}

/// Loads `ktscan.toml` when the project has one.
fn load_optional_config(
    project_dir: &Path,
) -> Result<Option<ProjectConfig>, Box<dyn std::error::Error>> {
    if project_dir.join("ktscan.toml").is_file() {
        Ok(Some(ktscan_config::load_project_config(project_dir)?))
    } else {
        Ok(None)
    }
}

/// Merges CLI flags over the config file; CLI flags win.
fn resolve_settings(args: &AnalyzeArgs, config: Option<&ProjectConfig>) -> SensorSettings {
    let analysis = config.map(|c| &c.analysis);
    SensorSettings {
        incremental: analysis.and_then(|a| a.incremental).unwrap_or(true),
        cache_enabled: !args.no_cache && analysis.and_then(|a| a.cache).unwrap_or(true),
        threads: args
            .threads
            .or_else(|| analysis.and_then(|a| a.threads))
            .unwrap_or(1),
        fail_fast: args.fail_fast,
    }
}

/// Source directories to scan, falling back to the project root when the
/// configured directory does not exist.
fn source_dirs(config: Option<&ProjectConfig>) -> Vec<String> {
    config
        .map(|c| c.project.sources.clone())
        .unwrap_or_else(|| vec!["src".to_string()])
}

fn module_key_from_dir(project_dir: &Path) -> String {
    project_dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string())
}

/// Recursively discovers `.kt` and `.kts` files, sorted by path.
///
/// When none of the configured source directories exist, the project root
/// itself is scanned. The host has no change information here, so every
/// file carries status `Unknown` and the cached digest decides.
fn discover_kotlin_files(
    project_dir: &Path,
    sources: &[String],
    module_key: &str,
) -> Result<Vec<FileSpec>, std::io::Error> {
    let mut roots: Vec<PathBuf> = sources
        .iter()
        .map(|s| project_dir.join(s))
        .filter(|p| p.is_dir())
        .collect();
    if roots.is_empty() {
        roots.push(project_dir.to_path_buf());
    }

    let mut paths = Vec::new();
    for root in &roots {
        collect_kotlin_files(root, &mut paths)?;
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let relative = path.strip_prefix(project_dir).unwrap_or(&path);
            FileSpec {
                key: FileKey::for_path(module_key, relative),
                path: path.clone(),
                status: InputStatus::Unknown,
            }
        })
        .collect())
}

fn collect_kotlin_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), std::io::Error> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            collect_kotlin_files(&path, out)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("kt") | Some("kts")
        ) {
            out.push(path);
        }
    }
    Ok(())
}

/// Renders the run outcome to the terminal.
fn render(
    report: &ktscan_analysis::SensorReport,
    log: &EventLog,
    format: ReportFormat,
    global: &GlobalArgs,
) {
    match format {
        ReportFormat::Text => {
            for record in log.records() {
                let show = record.severity.is_error()
                    || match record.severity {
                        Severity::Debug => global.verbose && !global.quiet,
                        _ => !global.quiet,
                    };
                if show {
                    eprintln!("{}: {}", record.severity, record.message);
                }
            }
            for issue in &report.issues {
                match &issue.location {
                    Some(at) => println!(
                        "{}: {}:{}:{}: [{}] {}",
                        issue.severity, issue.file_key, at.line, at.column, issue.rule,
                        issue.message
                    ),
                    None => println!(
                        "{}: {}: [{}] {}",
                        issue.severity, issue.file_key, issue.rule, issue.message
                    ),
                }
            }
            if !global.quiet {
                eprintln!(
                    "   Result: {} file(s) analyzed, {} skipped, {} finding(s), {} failure(s)",
                    report.analyzed,
                    report.skipped,
                    report.issues.len(),
                    report.analysis_errors.len()
                );
            }
        }
        ReportFormat::Json => {
            let payload = HashMap::from([
                ("issues", serde_json::to_value(&report.issues).unwrap_or_default()),
                (
                    "errors",
                    serde_json::to_value(&report.analysis_errors).unwrap_or_default(),
                ),
            ]);
            let json =
                serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}
