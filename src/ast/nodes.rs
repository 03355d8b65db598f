use std::time::Duration;

use crate::{
    ast::Operator,
    value::{Number, Pattern},
};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Nodes are immutable once built. The evaluator re-walks the whole tree on
/// every call and never caches anything inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // References
    /// Named variable, resolved through the scope
    ///
    /// # Example
    /// ```text
    /// "value"
    /// ```
    Reference(String),

    // Literals
    /// Boolean literal
    Bool(bool),

    /// Numeric literal, either an integer or a float
    ///
    /// # Example
    /// ```text
    /// 42
    /// 4.2
    /// ```
    Number(Number),

    /// Duration literal
    ///
    /// # Example
    /// ```text
    /// 10s
    /// ```
    Duration(Duration),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'cpu-total'
    /// ```
    String(String),

    /// Regex literal
    ///
    /// # Example
    /// ```text
    /// /^cpu/
    /// ```
    Regex(Pattern),

    // Operations
    /// Unary operation (`-x`, `!x`)
    Unary { op: Operator, node: Box<Node> },

    /// Binary operation (arithmetic, comparison, logical)
    Binary {
        op: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Function call
    ///
    /// # Examples
    /// ```text
    /// sigma("value")
    /// count()
    /// ```
    Function { name: String, args: Vec<Node> },

    // Opaque fragments, pushed onto the stack unchanged
    /// Bare identifier
    Identifier(String),

    /// Wildcard (`*`)
    Star,

    /// Lambda body (`lambda: expr`)
    Lambda(Box<Node>),

    /// List of nodes
    List(Vec<Node>),
}

impl Node {
    pub fn reference(name: impl Into<String>) -> Node {
        Node::Reference(name.into())
    }

    pub fn int(n: i64) -> Node {
        Node::Number(Number::Int(n))
    }

    pub fn float(n: f64) -> Node {
        Node::Number(Number::Float(n))
    }

    pub fn string(s: impl Into<String>) -> Node {
        Node::String(s.into())
    }

    /// Compile a regex literal.
    pub fn regex(source: &str) -> Result<Node, regex::Error> {
        Pattern::new(source).map(Node::Regex)
    }

    pub fn unary(op: Operator, node: Node) -> Node {
        Node::Unary {
            op,
            node: Box::new(node),
        }
    }

    pub fn binary(op: Operator, left: Node, right: Node) -> Node {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Node {
        Node::Function {
            name: name.into(),
            args,
        }
    }
}
