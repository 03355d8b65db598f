use std::fmt;

/// Operator tokens interpreted by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Math
    /// Addition (`+`)
    Plus,
    /// Subtraction or negation (`-`)
    Minus,
    /// Multiplication (`*`)
    Mult,
    /// Division (`/`)
    Div,
    /// Modulo (`%`), integers only
    Mod,

    // Comparison
    /// Logical AND (`&&`), boolean operands only
    And,
    /// Logical OR (`||`), boolean operands only
    Or,
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Regex match (`=~`)
    RegexEqual,
    /// Regex non-match (`!~`)
    RegexNotEqual,

    // Unary
    /// Logical negation (`!`)
    Not,
}

impl Operator {
    pub fn is_math(&self) -> bool {
        matches!(
            self,
            Operator::Plus | Operator::Minus | Operator::Mult | Operator::Div | Operator::Mod
        )
    }

    /// `&&` and `||` belong to this family, they are only defined for booleans.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::And
                | Operator::Or
                | Operator::Equal
                | Operator::NotEqual
                | Operator::Less
                | Operator::Greater
                | Operator::LessEqual
                | Operator::GreaterEqual
                | Operator::RegexEqual
                | Operator::RegexNotEqual
        )
    }

    /// The operator's source symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Mult => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::RegexEqual => "=~",
            Operator::RegexNotEqual => "!~",
            Operator::Not => "!",
        }
    }

    /// Look up an operator by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        let op = match symbol {
            "+" => Operator::Plus,
            "-" => Operator::Minus,
            "*" => Operator::Mult,
            "/" => Operator::Div,
            "%" => Operator::Mod,
            "&&" | "AND" => Operator::And,
            "||" | "OR" => Operator::Or,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "<" => Operator::Less,
            ">" => Operator::Greater,
            "<=" => Operator::LessEqual,
            ">=" => Operator::GreaterEqual,
            "=~" => Operator::RegexEqual,
            "!~" => Operator::RegexNotEqual,
            "!" => Operator::Not,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
