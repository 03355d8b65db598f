//! CLI support for tick-expr
//!
//! Drives a [`StatefulExpr`](crate::StatefulExpr) over a stream of JSON
//! records, one evaluation per record.

mod convert;
mod eval;

pub use convert::{json_to_node, json_to_scope, number_to_json, parse_duration};
pub use eval::{execute_check, execute_eval, EvalOptions, EvalSummary, ResultMode};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// The AST JSON is well-formed but does not describe a tree
    InvalidAst(String),
    /// A record cannot be turned into a scope
    InvalidRecord(String),
    /// A record line could not be decoded (only surfaced with fail-fast)
    Record {
        line: usize,
        source: Box<CliError>,
    },
    /// Evaluation of a record failed (only surfaced with fail-fast)
    Eval {
        line: usize,
        source: crate::EvalError,
    },
    /// A window of zero records
    InvalidWindow,
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidAst(msg) => write!(f, "Invalid AST: {}", msg),
            CliError::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
            CliError::Record { line, source } => {
                write!(f, "Bad record on line {}: {}", line, source)
            }
            CliError::Eval { line, source } => {
                write!(f, "Evaluation error on line {}: {}", line, source)
            }
            CliError::InvalidWindow => write!(f, "Window must be at least one record"),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(
                f,
                "No input provided. Use --input or pipe JSON lines to stdin."
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Record { source, .. } => Some(source.as_ref()),
            CliError::Eval { source, .. } => Some(source),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
