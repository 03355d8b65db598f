pub mod ast;
pub mod evaluator;
pub mod functions;
pub mod scope;
pub mod stack;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Node, Operator};
pub use evaluator::{EvalError, StatefulExpr};
pub use functions::{Function, FunctionError, Functions};
pub use scope::{LookupError, Scope, VarScope};
pub use stack::{Stack, StackError, StackItem};
pub use value::{Number, Pattern, Value};
