//! JSON <-> expression conversion utilities

use std::time::Duration;

use serde_json::Map;
use tracing::debug;

use super::CliError;
use crate::{Node, Number, Operator, Value, VarScope};

/// Decode a JSON-encoded AST.
///
/// Scalars are literals. Everything else is an object with one tag key:
/// `ref`, `duration`, `regex`, `unary`, `binary`, `call`, `ident`, `star`,
/// `lambda` or `list`.
pub fn json_to_node(v: &serde_json::Value) -> Result<Node, CliError> {
    match v {
        serde_json::Value::Bool(b) => Ok(Node::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Node::int(i)),
            None => n
                .as_f64()
                .map(Node::float)
                .ok_or_else(|| CliError::InvalidAst(format!("number {} is out of range", n))),
        },
        serde_json::Value::String(s) => Ok(Node::string(s.as_str())),
        serde_json::Value::Object(obj) => object_to_node(obj),
        serde_json::Value::Null | serde_json::Value::Array(_) => Err(CliError::InvalidAst(
            format!("expected a literal or a node object, got {}", v),
        )),
    }
}

fn object_to_node(obj: &Map<String, serde_json::Value>) -> Result<Node, CliError> {
    if let Some(name) = obj.get("ref") {
        return Ok(Node::Reference(as_str(name, "ref")?.to_string()));
    }
    if let Some(d) = obj.get("duration") {
        return parse_duration(as_str(d, "duration")?).map(Node::Duration);
    }
    if let Some(p) = obj.get("regex") {
        let source = as_str(p, "regex")?;
        return Node::regex(source)
            .map_err(|e| CliError::InvalidAst(format!("invalid regex /{}/: {}", source, e)));
    }
    if let Some(op) = obj.get("unary") {
        let op = operator(op)?;
        let node = json_to_node(field(obj, "node")?)?;
        return Ok(Node::unary(op, node));
    }
    if let Some(op) = obj.get("binary") {
        let op = operator(op)?;
        let left = json_to_node(field(obj, "left")?)?;
        let right = json_to_node(field(obj, "right")?)?;
        return Ok(Node::binary(op, left, right));
    }
    if let Some(name) = obj.get("call") {
        let name = as_str(name, "call")?;
        let args = match obj.get("args") {
            Some(args) => list(args, "args")?,
            None => Vec::new(),
        };
        return Ok(Node::call(name, args));
    }
    if let Some(name) = obj.get("ident") {
        return Ok(Node::Identifier(as_str(name, "ident")?.to_string()));
    }
    if obj.contains_key("star") {
        return Ok(Node::Star);
    }
    if let Some(body) = obj.get("lambda") {
        return Ok(Node::Lambda(Box::new(json_to_node(body)?)));
    }
    if let Some(items) = obj.get("list") {
        return list(items, "list").map(Node::List);
    }

    let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    Err(CliError::InvalidAst(format!(
        "unrecognized node object with keys [{}]",
        keys.join(", ")
    )))
}

fn field<'a>(
    obj: &'a Map<String, serde_json::Value>,
    key: &str,
) -> Result<&'a serde_json::Value, CliError> {
    obj.get(key)
        .ok_or_else(|| CliError::InvalidAst(format!("missing field '{}'", key)))
}

fn as_str<'a>(v: &'a serde_json::Value, key: &str) -> Result<&'a str, CliError> {
    v.as_str()
        .ok_or_else(|| CliError::InvalidAst(format!("field '{}' must be a string", key)))
}

fn list(v: &serde_json::Value, key: &str) -> Result<Vec<Node>, CliError> {
    match v {
        serde_json::Value::Array(items) => items.iter().map(json_to_node).collect(),
        _ => Err(CliError::InvalidAst(format!(
            "field '{}' must be an array",
            key
        ))),
    }
}

fn operator(v: &serde_json::Value) -> Result<Operator, CliError> {
    let symbol = as_str(v, "operator")?;
    Operator::from_symbol(symbol)
        .ok_or_else(|| CliError::InvalidAst(format!("unknown operator '{}'", symbol)))
}

/// Parse a duration literal such as `10s`, `5m` or `250ms`.
pub fn parse_duration(s: &str) -> Result<Duration, CliError> {
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| CliError::InvalidAst(format!("duration '{}' has no unit", s)))?;
    let (digits, unit) = s.split_at(split);
    let n: u64 = digits
        .parse()
        .map_err(|_| CliError::InvalidAst(format!("invalid duration '{}'", s)))?;

    let duration = match unit {
        "ns" => Duration::from_nanos(n),
        "u" | "us" | "µ" | "µs" => Duration::from_micros(n),
        "ms" => Duration::from_millis(n),
        "s" => Duration::from_secs(n),
        "m" => Duration::from_secs(n.saturating_mul(60)),
        "h" => Duration::from_secs(n.saturating_mul(3_600)),
        "d" => Duration::from_secs(n.saturating_mul(86_400)),
        "w" => Duration::from_secs(n.saturating_mul(604_800)),
        _ => {
            return Err(CliError::InvalidAst(format!(
                "unknown duration unit '{}' in '{}'",
                unit, s
            )));
        }
    };
    Ok(duration)
}

/// Build a scope from one flat JSON object record.
///
/// Fields holding null, arrays or objects have no scalar value and are left
/// out of the scope. Looking one up is a missing-name error.
pub fn json_to_scope(record: serde_json::Value) -> Result<VarScope, CliError> {
    let fields = match record {
        serde_json::Value::Object(fields) => fields,
        other => {
            return Err(CliError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                other
            )));
        }
    };

    let mut scope = VarScope::new();
    for (name, field) in fields {
        let value = match field {
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).ok_or_else(|| {
                    CliError::InvalidRecord(format!("field '{}' is out of range", name))
                })?,
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => {
                debug!(name = %name, "skipping non-scalar record field");
                continue;
            }
        };
        scope.set(name, value);
    }
    Ok(scope)
}

/// Convert a numeric result to JSON. Non-finite floats become `null`.
pub fn number_to_json(n: Number) -> serde_json::Value {
    match n {
        Number::Int(i) => serde_json::Value::Number(i.into()),
        Number::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_binary_tree() {
        let ast = json!({"binary": ">", "left": {"ref": "x"}, "right": 10});
        let node = json_to_node(&ast).unwrap();
        assert_eq!(
            node,
            Node::binary(Operator::Greater, Node::reference("x"), Node::int(10))
        );
    }

    #[test]
    fn test_decode_call_without_args() {
        let node = json_to_node(&json!({"call": "count"})).unwrap();
        assert_eq!(node, Node::call("count", vec![]));
    }

    #[test]
    fn test_decode_rejects_unknown_operator() {
        let ast = json!({"binary": "<>", "left": 1, "right": 2});
        assert!(matches!(json_to_node(&ast), Err(CliError::InvalidAst(_))));
    }

    #[test]
    fn test_decode_rejects_null() {
        assert!(json_to_node(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("10y").is_err());
        assert!(parse_duration("s").is_err());
    }

    #[test]
    fn test_record_to_scope() {
        use crate::Scope;

        let scope = json_to_scope(json!({"host": "a", "value": 1.5, "n": 3})).unwrap();
        assert_eq!(scope.get("host").unwrap(), Value::String("a".into()));
        assert_eq!(scope.get("value").unwrap(), Value::Float(1.5));
        assert_eq!(scope.get("n").unwrap(), Value::Int(3));

        assert!(matches!(
            json_to_scope(json!([1, 2])),
            Err(CliError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_record_skips_non_scalar_fields() {
        use crate::Scope;

        let scope =
            json_to_scope(json!({"x": 12, "meta": null, "tags": {"a": 1}, "l": [1]})).unwrap();
        assert_eq!(scope.get("x").unwrap(), Value::Int(12));
        assert!(scope.get("meta").is_err());
        assert!(scope.get("tags").is_err());
        assert!(scope.get("l").is_err());
    }
}
