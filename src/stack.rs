use std::fmt;

use crate::value::{Pattern, Value};

/// Errors raised by the operand stack.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StackError {
    #[error("stack is empty")]
    Empty,
}

/// One operand slot, carrying exactly one type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum StackItem {
    Int64(i64),
    Float64(f64),
    Bool(bool),
    String(String),
    Regex(Pattern),
    /// Anything without a dedicated tag (durations, regexes from scopes or
    /// functions, AST fragments). Never holds a bool, int, float or string;
    /// build items with `From<Value>` so those get their own tag.
    Generic(Value),
}

impl StackItem {
    /// The untagged value of the active variant.
    pub fn value(self) -> Value {
        match self {
            StackItem::Int64(n) => Value::Int(n),
            StackItem::Float64(n) => Value::Float(n),
            StackItem::Bool(b) => Value::Bool(b),
            StackItem::String(s) => Value::String(s),
            StackItem::Regex(p) => Value::Regex(p),
            StackItem::Generic(v) => v,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StackItem::Int64(_) => "int64",
            StackItem::Float64(_) => "float64",
            StackItem::Bool(_) => "bool",
            StackItem::String(_) => "string",
            StackItem::Regex(_) => "regex",
            StackItem::Generic(v) => v.type_name(),
        }
    }
}

impl From<Value> for StackItem {
    /// Infers the tag from the value. Regexes only receive the `Regex` tag
    /// through [`Stack::push_regex`], here they become `Generic`.
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => StackItem::Bool(b),
            Value::Int(n) => StackItem::Int64(n),
            Value::Float(n) => StackItem::Float64(n),
            Value::String(s) => StackItem::String(s),
            other => StackItem::Generic(other),
        }
    }
}

impl fmt::Display for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Int64(n) => write!(f, "{}", n),
            StackItem::Float64(n) => write!(f, "{}", n),
            StackItem::Bool(b) => write!(f, "{}", b),
            StackItem::String(s) => write!(f, "{}", s),
            StackItem::Regex(p) => write!(f, "/{}/", p.as_str()),
            StackItem::Generic(v) => write!(f, "{}", v),
        }
    }
}

/// LIFO operand stack used for a single evaluation.
#[derive(Debug, Default)]
pub struct Stack {
    data: Vec<StackItem>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Push a value, inferring its tag.
    pub fn push(&mut self, v: impl Into<Value>) {
        self.data.push(StackItem::from(v.into()));
    }

    pub fn push_int64(&mut self, v: i64) {
        self.data.push(StackItem::Int64(v));
    }

    pub fn push_float64(&mut self, v: f64) {
        self.data.push(StackItem::Float64(v));
    }

    pub fn push_bool(&mut self, v: bool) {
        self.data.push(StackItem::Bool(v));
    }

    pub fn push_string(&mut self, v: impl Into<String>) {
        self.data.push(StackItem::String(v.into()));
    }

    pub fn push_regex(&mut self, v: impl Into<Pattern>) {
        self.data.push(StackItem::Regex(v.into()));
    }

    /// Remove and return the top item with its tag.
    pub fn pop_item(&mut self) -> Result<StackItem, StackError> {
        self.data.pop().ok_or(StackError::Empty)
    }

    /// Remove the top item and return its untagged value.
    pub fn pop(&mut self) -> Result<Value, StackError> {
        self.pop_item().map(StackItem::value)
    }
}

impl fmt::Display for Stack {
    /// Renders top to bottom as `s[type:value,...]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("s[")?;
        for item in self.data.iter().rev() {
            write!(f, "{}:{},", item.type_name(), item)?;
        }
        f.write_str("]")
    }
}
