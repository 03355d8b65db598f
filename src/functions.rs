//! Stateful expression functions.
//!
//! Every function name maps to exactly one instance for the lifetime of a
//! [`Functions`] registry, so state accumulated by one call is visible to the
//! next until [`Functions::reset`] is invoked.

mod builtins;

use std::collections::HashMap;

use tracing::debug;

use crate::value::Value;

pub use builtins::{Abs, BoolCast, Count, FloatCast, IntCast, Sigma, Spread, StringCast};

/// Errors returned by a function's `call`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
    #[error("expected {expected} argument(s), got {got}")]
    ArgCount { expected: usize, got: usize },

    #[error("expected {expected} argument, got {got}")]
    ArgType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("{0}")]
    Conversion(String),
}

/// A callable whose internal state persists across calls until reset.
pub trait Function: Send {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError>;

    /// Clear accumulated state.
    fn reset(&mut self);
}

/// Named function instances owned by one evaluator.
#[derive(Default)]
pub struct Functions {
    funcs: HashMap<String, Box<dyn Function>>,
}

impl Functions {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default function set.
    ///
    /// - conversions: `bool`, `int`, `float`, `string`
    /// - math: `abs`
    /// - stateful: `count`, `sigma`, `spread`
    pub fn builtins() -> Self {
        let mut funcs = Functions::new();
        funcs.register("bool", BoolCast);
        funcs.register("int", IntCast);
        funcs.register("float", FloatCast);
        funcs.register("string", StringCast);
        funcs.register("abs", Abs);
        funcs.register("count", Count::default());
        funcs.register("sigma", Sigma::default());
        funcs.register("spread", Spread::default());
        funcs
    }

    /// Register a function, replacing any previous instance with that name.
    pub fn register(&mut self, name: impl Into<String>, func: impl Function + 'static) {
        self.funcs.insert(name.into(), Box::new(func));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Function + 'static)> {
        self.funcs.get_mut(name).map(|f| f.as_mut())
    }

    /// Sorted function names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Reset every registered function.
    pub fn reset(&mut self) {
        debug!(count = self.funcs.len(), "resetting function state");
        for func in self.funcs.values_mut() {
            func.reset();
        }
    }
}

impl std::fmt::Debug for Functions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Functions")
            .field("names", &self.names())
            .finish()
    }
}
