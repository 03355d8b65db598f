use std::collections::HashMap;

use crate::value::Value;

/// A variable name was not found in the scope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("name {name:?} is undefined. Names in scope: {}", .known.join(","))]
pub struct LookupError {
    pub name: String,
    /// Names that were available, sorted
    pub known: Vec<String>,
}

/// Name-to-value lookup consulted by the evaluator for every reference.
///
/// Scopes are supplied per call and normally change between calls (one per
/// incoming data point).
pub trait Scope {
    fn get(&self, name: &str) -> Result<Value, LookupError>;
}

/// A map-backed [`Scope`].
///
/// # Examples
///
/// ```
/// use tick_expr::{Scope, Value, VarScope};
///
/// let mut scope = VarScope::new();
/// scope.set("x", Value::Float(12.5));
/// assert_eq!(scope.get("x").unwrap(), Value::Float(12.5));
/// assert!(scope.get("y").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct VarScope {
    variables: HashMap<String, Value>,
}

impl VarScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Sorted variable names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Scope for VarScope {
    fn get(&self, name: &str) -> Result<Value, LookupError> {
        self.variables.get(name).cloned().ok_or_else(|| LookupError {
            name: name.to_string(),
            known: self.names(),
        })
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VarScope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut scope = VarScope::new();
        for (k, v) in iter {
            scope.set(k, v);
        }
        scope
    }
}
