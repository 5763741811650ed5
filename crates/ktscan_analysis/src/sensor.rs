//! The sensor: one end-to-end analysis run.

use crate::cpd::encode_tokens;
use crate::rules::{Issue, RuleRegistry};
use crate::semantics::{BindingProvider, SemanticContextGuard, TokenBindingProvider};
use crate::syntax::{KotlinTokenizer, Parser, SyntaxTree};
use ktscan_cache::{classify_batch, cpd_tokens_key, write_logged, AnalysisCache, CacheMigrator};
use ktscan_config::SensorSettings;
use ktscan_diagnostics::{AnalysisError, EventLog};
use ktscan_source::{FileKey, FileReader, FsReader, InputFile, InputStatus};
use rayon::prelude::*;
use std::path::PathBuf;

/// One file the host asks the sensor to consider, before its content is
/// read.
#[derive(Clone, Debug)]
pub struct FileSpec {
    /// Stable key identifying the file across runs.
    pub key: FileKey,
    /// Path to read the content from.
    pub path: PathBuf,
    /// Host-reported change status.
    pub status: InputStatus,
}

/// The outcome of one sensor run, surfaced to the host.
#[derive(Debug, Default)]
pub struct SensorReport {
    /// Rule findings across all analyzed files.
    pub issues: Vec<Issue>,
    /// Per-file read and parse failures.
    pub analysis_errors: Vec<AnalysisError>,
    /// Number of files parsed and checked this run.
    pub analyzed: usize,
    /// Number of files skipped as unchanged.
    pub skipped: usize,
    /// `true` when fail-fast is on and a per-file failure occurred.
    pub failed: bool,
}

/// Drives one analysis run end to end.
///
/// Per-file failures are contained: a file that cannot be read or parsed
/// is reported through the event log and the report's error list, and its
/// siblings continue. The only run-level degradation is losing the
/// semantic context, which downgrades the batch to syntax-only rules.
pub struct KotlinSensor {
    settings: SensorSettings,
    registry: RuleRegistry,
    parser: Box<dyn Parser>,
    binding: Box<dyn BindingProvider>,
    reader: Box<dyn FileReader>,
}

impl KotlinSensor {
    /// Creates a sensor with the bundled parser, binding provider and
    /// filesystem reader.
    pub fn new(settings: SensorSettings, registry: RuleRegistry) -> Self {
        Self {
            settings,
            registry,
            parser: Box::new(KotlinTokenizer),
            binding: Box::new(TokenBindingProvider),
            reader: Box::new(FsReader),
        }
    }

    /// Replaces the parser.
    pub fn with_parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the binding-context provider.
    pub fn with_binding_provider(mut self, binding: Box<dyn BindingProvider>) -> Self {
        self.binding = binding;
        self
    }

    /// Replaces the file reader.
    pub fn with_reader(mut self, reader: Box<dyn FileReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Runs one analysis over `specs`, reading, classifying, parsing and
    /// checking files, then committing the new cache state.
    pub fn execute(
        &self,
        specs: &[FileSpec],
        cache: &AnalysisCache,
        log: &EventLog,
    ) -> SensorReport {
        let mut report = SensorReport::default();

        let files = self.read_batch(specs, log, &mut report);
        let summary = classify_batch(&files, cache, self.settings.incremental, log);

        let to_parse: Vec<&InputFile> = files
            .iter()
            .filter(|f| summary.requires_analysis(f.key()))
            .collect();
        let trees = self.parse_batch(&to_parse, log, &mut report);

        let mut guard = SemanticContextGuard::new();
        let binding = guard.acquire(self.binding.as_ref(), &trees, log);

        for tree in &trees {
            self.registry
                .check_file(tree, binding.as_ref(), &mut report.issues);
            write_logged(
                cache,
                log,
                &cpd_tokens_key(tree.key()),
                &encode_tokens(tree.tokens()),
            );
        }

        CacheMigrator::new(cache, log).commit(&files, &summary);

        report.analyzed = trees.len();
        report.skipped = summary.skipped();
        report.failed = self.settings.fail_fast && !report.analysis_errors.is_empty();
        report
    }

    /// Reads the content of every requested file. Unreadable files are
    /// reported and dropped from the batch.
    fn read_batch(
        &self,
        specs: &[FileSpec],
        log: &EventLog,
        report: &mut SensorReport,
    ) -> Vec<InputFile> {
        let mut files = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.reader.read(&spec.path) {
                Ok(content) => files.push(InputFile::new(
                    spec.key.clone(),
                    spec.path.clone(),
                    content,
                    spec.status,
                )),
                Err(err) => {
                    log.error(format!("Cannot read '{}': {}", spec.key, err.source));
                    report
                        .analysis_errors
                        .push(AnalysisError::whole_file(&spec.key, err.source.to_string()));
                }
            }
        }
        files
    }

    /// Parses the files requiring analysis, in parallel when the settings
    /// ask for more than one thread. Unparsable files are reported and
    /// dropped.
    fn parse_batch(
        &self,
        files: &[&InputFile],
        log: &EventLog,
        report: &mut SensorReport,
    ) -> Vec<SyntaxTree> {
        let results = if self.settings.threads > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.settings.threads)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    files
                        .par_iter()
                        .map(|f| self.parser.parse(f))
                        .collect::<Vec<_>>()
                }),
                Err(err) => {
                    log.warn(format!(
                        "Could not start {} parser threads ({err}), parsing sequentially",
                        self.settings.threads
                    ));
                    files.iter().map(|f| self.parser.parse(f)).collect()
                }
            }
        } else {
            files.iter().map(|f| self.parser.parse(f)).collect()
        };

        let mut trees = Vec::with_capacity(files.len());
        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(tree) => trees.push(tree),
                Err(err) => {
                    log.error(format!("Unable to parse file: {}", file.key()));
                    report.analysis_errors.push(match err.location {
                        Some(location) => AnalysisError::at(file.key(), err.message, location),
                        None => AnalysisError::whole_file(file.key(), err.message),
                    });
                }
            }
        }
        trees
    }
}
