//! # TICK Expressions - Abstract Syntax Tree
//!
//! This module defines the node shapes the stateful evaluator interprets.
//! Trees are produced elsewhere (a TICKscript parser, a JSON decoder, or by
//! hand) and handed to [`StatefulExpr`](crate::StatefulExpr) as immutable values.
//!
//! ## Architecture Overview
//!
//! - **[nodes]** - Expression nodes (literals, references, operations, calls)
//! - **[operators]** - The operator tokens the evaluator understands
//!
//! ## Quick Start
//!
//! ```text
//! "value" > 10 && sigma("value") > 3.0
//! ```
//!
//! The tree for `x > 10`:
//!
//! ```
//! use tick_expr::ast::{Node, Operator};
//!
//! let node = Node::binary(Operator::Greater, Node::reference("x"), Node::int(10));
//! ```
//!
//! ## Operator Families
//!
//! - **Math** `+ - * / %` - both operands must share a numeric type
//! - **Comparison** `== != < > <= >= =~ !~` plus `&& ||` - type-driven dispatch,
//!   int operands are widened when compared against floats
//! - **Unary** `-` and `!`
pub mod nodes;
pub mod operators;

pub use nodes::Node;
pub use operators::Operator;
