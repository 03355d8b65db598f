use tracing::trace;

use crate::{
    ast::{Node, Operator},
    functions::{FunctionError, Functions},
    scope::{LookupError, Scope},
    stack::{Stack, StackError, StackItem},
    value::{Number, Value},
};

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// An operator popped more operands than were pushed
    #[error(transparent)]
    Stack(#[from] StackError),

    /// A referenced name is missing from the scope
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Operand types are incompatible with the binary operator
    #[error("mismatched type to binary operator. got {left} {op} {right}. see bool(), int(), float()")]
    TypeMismatch {
        op: Operator,
        left: &'static str,
        right: &'static str,
    },

    /// Operand type is incompatible with the unary operator
    #[error("invalid argument to '{op}': {operand}")]
    InvalidUnaryOperand { op: Operator, operand: &'static str },

    /// Operator is in neither the math nor the comparison family
    #[error("unknown operator {0}")]
    UnknownOperator(Operator),

    /// Operator is not defined for this operand family, e.g. `<` on booleans
    #[error("invalid {family} operator {op}")]
    InvalidOperator { op: Operator, family: &'static str },

    /// Integer division or modulo by zero
    #[error("integer division by zero")]
    DivisionByZero,

    #[error("undefined function {0}")]
    UndefinedFunction(String),

    #[error("error calling {name}: {source}")]
    FunctionCall {
        name: String,
        source: FunctionError,
    },

    /// The stack did not hold exactly one value after evaluation
    #[error("expression is invalid, could not evaluate")]
    InvalidExpression,

    #[error("expression returned unexpected type {0}")]
    UnexpectedType(&'static str),
}

/// An expression paired with the state of the functions it calls.
///
/// Build one per compiled expression and call [`eval_bool`](Self::eval_bool)
/// or [`eval_num`](Self::eval_num) once per data point. Function state
/// accumulates across calls until [`reset`](Self::reset).
///
/// Evaluation takes `&mut self`, so one instance serves one sequential stream.
/// Parallel workers each build their own.
///
/// # Examples
///
/// ```
/// use tick_expr::{Node, Operator, StatefulExpr, Value, VarScope};
///
/// // x > 10
/// let node = Node::binary(Operator::Greater, Node::reference("x"), Node::int(10));
/// let mut expr = StatefulExpr::new(node);
///
/// let mut scope = VarScope::new();
/// scope.set("x", Value::Float(12.5));
/// assert_eq!(expr.eval_bool(&scope), Ok(true));
/// ```
#[derive(Debug)]
pub struct StatefulExpr {
    node: Node,
    functions: Functions,
}

impl StatefulExpr {
    /// Creates an evaluator backed by the default function set.
    pub fn new(node: Node) -> Self {
        Self::with_functions(node, Functions::builtins())
    }

    pub fn with_functions(node: Node, functions: Functions) -> Self {
        StatefulExpr { node, functions }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn functions_mut(&mut self) -> &mut Functions {
        &mut self.functions
    }

    /// Clears the state of every function. The tree is untouched.
    pub fn reset(&mut self) {
        self.functions.reset();
    }

    /// Evaluates the expression, expecting a boolean result.
    pub fn eval_bool(&mut self, scope: &dyn Scope) -> Result<bool, EvalError> {
        let mut stack = self.run(scope)?;
        if stack.len() != 1 {
            return Err(EvalError::InvalidExpression);
        }

        match stack.pop_item()? {
            StackItem::Bool(b) => Ok(b),
            other => Err(EvalError::UnexpectedType(other.type_name())),
        }
    }

    /// Evaluates the expression, expecting an int64 or float64 result.
    ///
    /// A trailing reference node is resolved through `scope` first.
    pub fn eval_num(&mut self, scope: &dyn Scope) -> Result<Number, EvalError> {
        let mut stack = self.run(scope)?;
        if stack.len() != 1 {
            return Err(EvalError::InvalidExpression);
        }

        let value = resolve(stack.pop()?, scope)?;
        match value.as_number() {
            Some(n) => Ok(n),
            None => Err(EvalError::UnexpectedType(value.type_name())),
        }
    }

    fn run(&mut self, scope: &dyn Scope) -> Result<Stack, EvalError> {
        let mut stack = Stack::new();
        eval_node(&self.node, scope, &mut self.functions, &mut stack)?;
        trace!(stack = %stack, "evaluated expression");
        Ok(stack)
    }
}

/// Replaces an unresolved reference node by its value in `scope`.
fn resolve(value: Value, scope: &dyn Scope) -> Result<Value, EvalError> {
    match value {
        Value::Node(Node::Reference(name)) => Ok(scope.get(&name)?),
        other => Ok(other),
    }
}

fn eval_node(
    node: &Node,
    scope: &dyn Scope,
    functions: &mut Functions,
    stack: &mut Stack,
) -> Result<(), EvalError> {
    match node {
        Node::Reference(name) => stack.push(scope.get(name)?),
        Node::Bool(b) => stack.push_bool(*b),
        Node::Number(Number::Int(n)) => stack.push_int64(*n),
        Node::Number(Number::Float(n)) => stack.push_float64(*n),
        Node::Duration(d) => stack.push(Value::Duration(*d)),
        Node::String(s) => stack.push_string(s.as_str()),
        Node::Regex(p) => stack.push_regex(p.clone()),
        Node::Unary { op, node } => {
            eval_node(node, scope, functions, stack)?;
            eval_unary(*op, stack)?;
        }
        Node::Binary { op, left, right } => {
            eval_node(left, scope, functions, stack)?;
            eval_node(right, scope, functions, stack)?;
            eval_binary(*op, stack)?;
        }
        Node::Function { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                eval_node(arg, scope, functions, stack)?;
                values.push(resolve(stack.pop()?, scope)?);
            }

            let func = functions
                .get_mut(name)
                .ok_or_else(|| EvalError::UndefinedFunction(name.clone()))?;
            trace!(function = %name, args = values.len(), "calling function");
            let ret = func.call(&values).map_err(|source| EvalError::FunctionCall {
                name: name.clone(),
                source,
            })?;
            stack.push(ret);
        }
        Node::Identifier(_) | Node::Star | Node::Lambda(_) | Node::List(_) => {
            stack.push(Value::Node(node.clone()))
        }
    }
    Ok(())
}

fn eval_unary(op: Operator, stack: &mut Stack) -> Result<(), EvalError> {
    let item = stack.pop_item()?;
    match (op, item) {
        (Operator::Minus, StackItem::Int64(n)) => stack.push_int64(n.wrapping_neg()),
        (Operator::Minus, StackItem::Float64(n)) => stack.push_float64(-n),
        (Operator::Not, StackItem::Bool(b)) => stack.push_bool(!b),
        (Operator::Minus | Operator::Not, other) => {
            return Err(EvalError::InvalidUnaryOperand {
                op,
                operand: other.type_name(),
            });
        }
        (op, _) => return Err(EvalError::UnknownOperator(op)),
    }
    Ok(())
}

fn mismatched(op: Operator, left: &StackItem, right: &StackItem) -> EvalError {
    EvalError::TypeMismatch {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn eval_binary(op: Operator, stack: &mut Stack) -> Result<(), EvalError> {
    let right = stack.pop_item()?;
    let left = stack.pop_item()?;

    if op.is_math() {
        // No implicit widening here, unlike comparisons
        let result = match (&left, &right) {
            (StackItem::Int64(l), StackItem::Int64(r)) => Value::Int(int_math(op, *l, *r)?),
            (StackItem::Float64(l), StackItem::Float64(r)) => {
                Value::Float(float_math(op, *l, *r)?)
            }
            _ => return Err(mismatched(op, &left, &right)),
        };
        stack.push(result);
        Ok(())
    } else if op.is_comparison() {
        let result = match (&left, &right) {
            (StackItem::Bool(l), StackItem::Bool(r)) => bool_comparison(op, *l, *r)?,
            (StackItem::String(l), StackItem::String(r)) => {
                ordered(op, "string comparison", l, r)?
            }
            (StackItem::String(l), StackItem::Regex(r)) => match op {
                Operator::RegexEqual => r.is_match(l),
                Operator::RegexNotEqual => !r.is_match(l),
                _ => {
                    return Err(EvalError::InvalidOperator {
                        op,
                        family: "regex comparison",
                    });
                }
            },
            (StackItem::Float64(l), StackItem::Float64(r)) => {
                ordered(op, "float comparison", l, r)?
            }
            (StackItem::Float64(l), StackItem::Int64(r)) => {
                ordered(op, "float comparison", l, &(*r as f64))?
            }
            (StackItem::Int64(l), StackItem::Float64(r)) => {
                ordered(op, "float comparison", &(*l as f64), r)?
            }
            (StackItem::Int64(l), StackItem::Int64(r)) => ordered(op, "int comparison", l, r)?,
            _ => return Err(mismatched(op, &left, &right)),
        };
        stack.push_bool(result);
        Ok(())
    } else {
        Err(EvalError::UnknownOperator(op))
    }
}

/// Integer math wraps on overflow.
fn int_math(op: Operator, l: i64, r: i64) -> Result<i64, EvalError> {
    match op {
        Operator::Plus => Ok(l.wrapping_add(r)),
        Operator::Minus => Ok(l.wrapping_sub(r)),
        Operator::Mult => Ok(l.wrapping_mul(r)),
        Operator::Div if r == 0 => Err(EvalError::DivisionByZero),
        Operator::Div => Ok(l.wrapping_div(r)),
        Operator::Mod if r == 0 => Err(EvalError::DivisionByZero),
        Operator::Mod => Ok(l.wrapping_rem(r)),
        _ => Err(EvalError::InvalidOperator {
            op,
            family: "integer math",
        }),
    }
}

fn float_math(op: Operator, l: f64, r: f64) -> Result<f64, EvalError> {
    match op {
        Operator::Plus => Ok(l + r),
        Operator::Minus => Ok(l - r),
        Operator::Mult => Ok(l * r),
        Operator::Div => Ok(l / r),
        _ => Err(EvalError::InvalidOperator {
            op,
            family: "float math",
        }),
    }
}

fn bool_comparison(op: Operator, l: bool, r: bool) -> Result<bool, EvalError> {
    match op {
        Operator::Equal => Ok(l == r),
        Operator::NotEqual => Ok(l != r),
        Operator::And => Ok(l && r),
        Operator::Or => Ok(l || r),
        _ => Err(EvalError::InvalidOperator {
            op,
            family: "boolean comparison",
        }),
    }
}

/// Equality and ordering for the totally ordered operand types.
fn ordered<T: PartialOrd + ?Sized>(
    op: Operator,
    family: &'static str,
    l: &T,
    r: &T,
) -> Result<bool, EvalError> {
    match op {
        Operator::Equal => Ok(l == r),
        Operator::NotEqual => Ok(l != r),
        Operator::Less => Ok(l < r),
        Operator::Greater => Ok(l > r),
        Operator::LessEqual => Ok(l <= r),
        Operator::GreaterEqual => Ok(l >= r),
        _ => Err(EvalError::InvalidOperator { op, family }),
    }
}
