//! Rule engine: per-file checks over syntax trees, with optional access
//! to the batch-wide binding context.

use crate::semantics::BindingContext;
use crate::syntax::{SyntaxTree, TokenKind};
use ktscan_diagnostics::{Severity, TextPointer};
use serde::Serialize;
use std::collections::HashSet;

/// One rule finding in one file.
#[derive(Clone, Debug, Serialize)]
pub struct Issue {
    /// The reporting rule's name.
    pub rule: String,
    /// Key of the file the finding is in.
    pub file_key: String,
    /// Human-readable description of the finding.
    pub message: String,
    /// The finding site, when the rule can point at one.
    pub location: Option<TextPointer>,
    /// Severity assigned by the rule.
    pub severity: Severity,
}

/// A single analysis rule.
///
/// `binding` is `None` when the run is degraded to syntax-only mode;
/// semantic rules must silently skip in that case.
pub trait Rule: Send + Sync {
    /// Stable rule name used in findings and allow-lists.
    fn name(&self) -> &str;

    /// Short description of what the rule reports.
    fn description(&self) -> &str;

    /// Checks one file, appending findings to `issues`.
    fn check(&self, tree: &SyntaxTree, binding: Option<&BindingContext>, issues: &mut Vec<Issue>);
}

/// The set of rules active for a run.
///
/// An empty allow-list activates every registered rule; a non-empty one
/// restricts the run to the named rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    allow: HashSet<String>,
}

impl RuleRegistry {
    /// Creates an empty registry with no allow-list restriction.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            allow: HashSet::new(),
        }
    }

    /// Restricts the registry to the named rules.
    pub fn with_allow_list(mut self, allow: impl IntoIterator<Item = String>) -> Self {
        self.allow = allow.into_iter().collect();
        self
    }

    /// Registers a rule.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Returns the rules active under the current allow-list.
    pub fn active_rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules
            .iter()
            .map(Box::as_ref)
            .filter(|r| self.allow.is_empty() || self.allow.contains(r.name()))
    }

    /// Runs every active rule over one file.
    pub fn check_file(
        &self,
        tree: &SyntaxTree,
        binding: Option<&BindingContext>,
        issues: &mut Vec<Issue>,
    ) {
        for rule in self.active_rules() {
            rule.check(tree, binding, issues);
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers the bundled rules.
pub fn register_builtin_rules(registry: &mut RuleRegistry) {
    registry.register(Box::new(WildcardImportRule));
    registry.register(Box::new(DuplicateFunctionRule));
}

/// Flags `import a.b.*` style wildcard imports.
struct WildcardImportRule;

impl Rule for WildcardImportRule {
    fn name(&self) -> &str {
        "wildcard-import"
    }

    fn description(&self) -> &str {
        "wildcard imports hide which names a file depends on"
    }

    fn check(&self, tree: &SyntaxTree, _binding: Option<&BindingContext>, issues: &mut Vec<Issue>) {
        let tokens = tree.tokens();
        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Keyword || token.text != "import" {
                continue;
            }
            // Wildcard imports end the import path with ".*" on the same line.
            let star = tokens[i + 1..]
                .iter()
                .take_while(|t| t.line == token.line)
                .find(|t| t.kind == TokenKind::Symbol && t.text == "*");
            if let Some(star) = star {
                issues.push(Issue {
                    rule: self.name().to_string(),
                    file_key: tree.key().as_str().to_string(),
                    message: "Replace this wildcard import with explicit imports.".to_string(),
                    location: Some(TextPointer::new(star.line, star.column)),
                    severity: Severity::Warn,
                });
            }
        }
    }
}

/// Flags top-level functions declared with the same name in more than
/// one file of the batch. Needs the binding context; inactive in
/// syntax-only mode.
struct DuplicateFunctionRule;

impl Rule for DuplicateFunctionRule {
    fn name(&self) -> &str {
        "duplicate-function"
    }

    fn description(&self) -> &str {
        "top-level functions redeclared across files shadow each other"
    }

    fn check(&self, tree: &SyntaxTree, binding: Option<&BindingContext>, issues: &mut Vec<Issue>) {
        let Some(binding) = binding else {
            return;
        };
        let tokens = tree.tokens();
        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Keyword || token.text != "fun" {
                continue;
            }
            let Some(name) = tokens.get(i + 1) else {
                continue;
            };
            if name.kind != TokenKind::Identifier {
                continue;
            }
            let declarations = binding.declarations_of(&name.text);
            if declarations.len() > 1 && declarations.iter().any(|k| k != tree.key()) {
                issues.push(Issue {
                    rule: self.name().to_string(),
                    file_key: tree.key().as_str().to_string(),
                    message: format!(
                        "Function '{}' is also declared in another file.",
                        name.text
                    ),
                    location: Some(TextPointer::new(name.line, name.column)),
                    severity: Severity::Warn,
                });
            }
        }
    }
}
