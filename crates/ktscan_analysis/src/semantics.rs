//! Semantic (binding) context construction behind a failure guard.
//!
//! Binding-context construction talks to the compiler front-end and can
//! fail for reasons unrelated to any single file (classpath I/O, internal
//! front-end bugs). The guard converts that failure into one ERROR-level
//! diagnostic and a syntax-only run instead of letting it abort the
//! sensor. Construction is a result-returning call; no unwinding is
//! involved.

use crate::error::BindError;
use crate::syntax::{SyntaxTree, TokenKind};
use ktscan_diagnostics::EventLog;
use ktscan_source::FileKey;
use std::collections::HashMap;

/// Resolved cross-file semantic information for one batch.
///
/// Maps declared top-level function names to the files declaring them.
/// Absence of a context is a valid terminal state (syntax-only mode),
/// not an error state.
pub struct BindingContext {
    functions: HashMap<String, Vec<FileKey>>,
}

impl BindingContext {
    /// Returns the files declaring a function of the given name.
    pub fn declarations_of(&self, name: &str) -> &[FileKey] {
        self.functions.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of distinct declared function names.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// Constructs the binding context for a batch of parsed files.
pub trait BindingProvider: Send + Sync {
    /// Builds the context, or reports why the front-end could not.
    fn bind(&self, trees: &[SyntaxTree]) -> Result<BindingContext, BindError>;
}

/// The bundled provider: resolves function declarations from token
/// streams (`fun` keyword followed by an identifier).
pub struct TokenBindingProvider;

impl BindingProvider for TokenBindingProvider {
    fn bind(&self, trees: &[SyntaxTree]) -> Result<BindingContext, BindError> {
        let mut functions: HashMap<String, Vec<FileKey>> = HashMap::new();
        for tree in trees {
            let tokens = tree.tokens();
            for (i, token) in tokens.iter().enumerate() {
                if token.kind == TokenKind::Keyword && token.text == "fun" {
                    if let Some(name) = tokens.get(i + 1) {
                        if name.kind == TokenKind::Identifier {
                            functions
                                .entry(name.text.clone())
                                .or_default()
                                .push(tree.key().clone());
                        }
                    }
                }
            }
        }
        Ok(BindingContext { functions })
    }
}

/// Construction progress for one run. `Failed` is terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GuardState {
    /// No file has required semantics yet; construction was never tried.
    NotAttempted,
    /// Construction succeeded; the context is available.
    Succeeded,
    /// Construction failed; the run continues syntax-only.
    Failed,
}

/// Contains binding-context failures to a single diagnostic per run.
///
/// On the first failure exactly one ERROR record is emitted and the state
/// becomes terminal: later acquisition attempts return `None` silently.
/// With an empty batch, construction is never attempted and nothing is
/// logged; attempting construction over zero files is itself the bug this
/// guards against.
pub struct SemanticContextGuard {
    state: GuardState,
}

impl SemanticContextGuard {
    /// Creates a guard in the `NotAttempted` state.
    pub fn new() -> Self {
        Self {
            state: GuardState::NotAttempted,
        }
    }

    /// Returns the current construction state.
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Attempts to construct the binding context for the batch.
    pub fn acquire(
        &mut self,
        provider: &dyn BindingProvider,
        trees: &[SyntaxTree],
        log: &EventLog,
    ) -> Option<BindingContext> {
        if trees.is_empty() || self.state == GuardState::Failed {
            return None;
        }
        match provider.bind(trees) {
            Ok(context) => {
                self.state = GuardState::Succeeded;
                Some(context)
            }
            Err(_) => {
                self.state = GuardState::Failed;
                log.error("Could not generate binding context. Proceeding without semantics.");
                None
            }
        }
    }
}

impl Default for SemanticContextGuard {
    fn default() -> Self {
        Self::new()
    }
}
