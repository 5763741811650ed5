//! Sensor orchestration for the ktscan analyzer.
//!
//! Drives one analysis run end to end: read the batch, classify files
//! against the incremental cache, parse what changed, construct the
//! semantic context behind a failure-containment guard, run the rules,
//! and commit the new cache state. Per-file failures are contained: a
//! file that cannot be read or parsed is reported and skipped, and a
//! semantic front-end failure degrades the whole batch to syntax-only
//! analysis. Nothing in here aborts the run.

#![warn(missing_docs)]

mod cpd;
mod error;
mod rules;
mod semantics;
mod sensor;
mod syntax;

pub use cpd::{decode_tokens, encode_tokens};
pub use error::{BindError, ParseError};
pub use rules::{register_builtin_rules, Issue, Rule, RuleRegistry};
pub use semantics::{
    BindingContext, BindingProvider, GuardState, SemanticContextGuard, TokenBindingProvider,
};
pub use sensor::{FileSpec, KotlinSensor, SensorReport};
pub use syntax::{KotlinTokenizer, Parser, SyntaxTree, Token, TokenKind};
