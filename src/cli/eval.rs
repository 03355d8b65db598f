//! Evaluate an expression against a stream of JSON records

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use super::{json_to_node, json_to_scope, number_to_json, CliError};
use crate::{Node, StatefulExpr};

/// Which result type each record evaluates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultMode {
    #[default]
    Bool,
    Num,
}

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// JSON-encoded AST
    pub ast: String,
    pub mode: ResultMode,
    /// Reset function state every `window` records. Zero is rejected.
    pub window: Option<usize>,
    /// Stop at the first record that fails to decode or evaluate
    pub fail_fast: bool,
}

/// Counters reported once the input is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalSummary {
    pub records: usize,
    pub errors: usize,
}

/// Decode and validate an AST without evaluating it
pub fn execute_check(ast: &str) -> Result<Node, CliError> {
    let json: serde_json::Value = serde_json::from_str(ast)?;
    json_to_node(&json)
}

/// Evaluate the expression once per JSON line of `input`, writing one JSON
/// result per line to `out`.
///
/// Records that cannot be decoded or fail to evaluate are written as
/// `{"error": "..."}` unless `fail_fast` is set. Blank lines are skipped.
pub fn execute_eval(
    options: &EvalOptions,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<EvalSummary, CliError> {
    if options.window == Some(0) {
        return Err(CliError::InvalidWindow);
    }
    let node = execute_check(&options.ast)?;
    let mut expr = StatefulExpr::new(node);
    let mut summary = EvalSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(window) = options.window
            && summary.records > 0
            && summary.records % window == 0
        {
            debug!(records = summary.records, "window complete");
            expr.reset();
        }
        summary.records += 1;

        let output = match eval_record(&mut expr, options.mode, &line, index + 1) {
            Ok(value) => value,
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                warn!(line = index + 1, error = %e, "record failed");
                summary.errors += 1;
                serde_json::json!({ "error": e.to_string() })
            }
        };
        writeln!(out, "{}", output)?;
    }

    Ok(summary)
}

fn eval_record(
    expr: &mut StatefulExpr,
    mode: ResultMode,
    record: &str,
    line: usize,
) -> Result<serde_json::Value, CliError> {
    let scope = serde_json::from_str(record)
        .map_err(CliError::from)
        .and_then(json_to_scope)
        .map_err(|e| CliError::Record {
            line,
            source: Box::new(e),
        })?;

    let result = match mode {
        ResultMode::Bool => expr.eval_bool(&scope).map(serde_json::Value::Bool),
        ResultMode::Num => expr.eval_num(&scope).map(number_to_json),
    };
    result.map_err(|source| CliError::Eval { line, source })
}
