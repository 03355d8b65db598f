use std::fmt;
use std::time::Duration;

use regex::Regex;

use crate::ast::Node;

/// A runtime value exchanged with scopes and stateful functions.
///
/// This is the untagged side of the evaluator: whatever a [`Scope`](crate::Scope)
/// resolves or a [`Function`](crate::Function) returns. The operand stack
/// re-tags it on push (see [`StackItem`](crate::StackItem)).
///
/// # Examples
///
/// ```
/// use tick_expr::Value;
///
/// let v = Value::Float(12.5);
/// assert_eq!(v.type_name(), "float64");
/// assert_eq!(Value::from(3i64), Value::Int(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),

    /// 64-bit float
    Float(f64),

    /// Boolean
    Bool(bool),

    /// UTF-8 string
    String(String),

    /// Compiled regular expression
    Regex(Pattern),

    /// Time span (duration literals)
    Duration(Duration),

    /// Opaque AST fragment passed through the evaluator unchanged
    Node(Node),
}

impl Value {
    /// Human-readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int64",
            Value::Float(_) => "float64",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Regex(_) => "regex",
            Value::Duration(_) => "duration",
            Value::Node(_) => "node",
        }
    }

    /// Get as a number if the value is int64 or float64.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(n) => Some(Number::Float(*n)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Regex(p) => write!(f, "/{}/", p.as_str()),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Node(n) => write!(f, "{:?}", n),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

/// A numeric result: either int64 or float64, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Widen to float64.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Float(n) => *n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

/// A compiled regular expression that compares equal by source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a new pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern)
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    /// The pattern's source text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern(re)
    }
}
