#![cfg(feature = "cli")]

use pretty_assertions::assert_eq;
use tick_expr::cli::{execute_check, execute_eval, CliError, EvalOptions, EvalSummary, ResultMode};
use tick_expr::{Node, Operator};

fn run(options: &EvalOptions, input: &str) -> Result<(String, EvalSummary), CliError> {
    let mut out = Vec::new();
    let summary = execute_eval(options, input.as_bytes(), &mut out)?;
    Ok((String::from_utf8(out).unwrap(), summary))
}

fn options(ast: &str) -> EvalOptions {
    EvalOptions {
        ast: ast.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_check_decodes_ast() {
    let ast = r#"{"binary": "=~", "left": "abc", "right": {"regex": "^a"}}"#;
    let node = execute_check(ast).unwrap();
    assert_eq!(
        node,
        Node::binary(
            Operator::RegexEqual,
            Node::string("abc"),
            Node::regex("^a").unwrap()
        )
    );
}

#[test]
fn test_check_rejects_bad_json() {
    assert!(matches!(execute_check("{"), Err(CliError::Json(_))));
    assert!(matches!(
        execute_check(r#"{"regex": "("}"#),
        Err(CliError::InvalidAst(_))
    ));
}

#[test]
fn test_eval_bool_per_record() {
    let opts = options(r#"{"binary": ">", "left": {"ref": "x"}, "right": 10}"#);
    let input = "{\"x\": 12.5}\n\n{\"x\": 3}\n";

    let (out, summary) = run(&opts, input).unwrap();
    assert_eq!(out, "true\nfalse\n");
    assert_eq!(summary, EvalSummary { records: 2, errors: 0 });
}

#[test]
fn test_eval_num_with_window_reset() {
    let opts = EvalOptions {
        mode: ResultMode::Num,
        window: Some(2),
        ..options(r#"{"call": "count"}"#)
    };
    let input = "{}\n{}\n{}\n{}\n{}\n";

    let (out, summary) = run(&opts, input).unwrap();
    assert_eq!(out, "1\n2\n1\n2\n1\n");
    assert_eq!(summary.records, 5);
}

#[test]
fn test_eval_reports_record_errors() {
    let opts = options(r#"{"binary": ">", "left": {"ref": "x"}, "right": 10}"#);
    let input = "{\"x\": 11}\n{\"y\": 1}\n{\"x\": 1}\n";

    let (out, summary) = run(&opts, input).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "true");
    assert!(lines[1].starts_with("{\"error\":"));
    assert_eq!(lines[2], "false");
    assert_eq!(summary, EvalSummary { records: 3, errors: 1 });
}

#[test]
fn test_eval_fail_fast() {
    let opts = EvalOptions {
        fail_fast: true,
        ..options(r#"{"binary": ">", "left": {"ref": "x"}, "right": 10}"#)
    };
    let input = "{\"x\": 11}\n{\"y\": 1}\n";

    match run(&opts, input) {
        Err(CliError::Eval { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected an eval error, got {:?}", other),
    }
}

#[test]
fn test_eval_reports_undecodable_records() {
    let opts = options(r#"{"binary": ">", "left": {"ref": "x"}, "right": 10}"#);
    let input = "{\"x\": 11}\nnot json\n[1]\n{\"x\": 1}\n";

    let (out, summary) = run(&opts, input).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "true");
    assert!(lines[1].contains("line 2"), "{}", lines[1]);
    assert!(lines[2].contains("line 3"), "{}", lines[2]);
    assert_eq!(lines[3], "false");
    assert_eq!(summary, EvalSummary { records: 4, errors: 2 });
}

#[test]
fn test_eval_ignores_unused_non_scalar_fields() {
    let opts = options(r#"{"binary": ">", "left": {"ref": "x"}, "right": 10}"#);
    let input = "{\"x\": 11}\n{\"x\": 12, \"meta\": null, \"tags\": {\"a\": 1}}\n{\"x\": 1}\n";

    let (out, summary) = run(&opts, input).unwrap();
    assert_eq!(out, "true\ntrue\nfalse\n");
    assert_eq!(summary, EvalSummary { records: 3, errors: 0 });
}

#[test]
fn test_eval_fail_fast_on_bad_record_keeps_line() {
    let opts = EvalOptions {
        fail_fast: true,
        ..options("true")
    };

    match run(&opts, "{}\nnot json\n") {
        Err(CliError::Record { line, source }) => {
            assert_eq!(line, 2);
            assert!(matches!(*source, CliError::Json(_)));
        }
        other => panic!("expected a record error, got {:?}", other),
    }
    match run(&opts, "\n[1]\n") {
        Err(CliError::Record { line, source }) => {
            assert_eq!(line, 2);
            assert!(matches!(*source, CliError::InvalidRecord(_)));
        }
        other => panic!("expected a record error, got {:?}", other),
    }
}

#[test]
fn test_eval_rejects_zero_window() {
    let opts = EvalOptions {
        window: Some(0),
        ..options(r#"{"call": "count"}"#)
    };
    assert!(matches!(run(&opts, "{}\n"), Err(CliError::InvalidWindow)));
}
