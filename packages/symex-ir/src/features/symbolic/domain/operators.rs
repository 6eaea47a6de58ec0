//! Operators for binary, logical and unary expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators (arithmetic and comparison)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 11] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
    ];

    /// ADD, SUB, MUL, DIV or MOD
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        !self.is_arithmetic()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical connectives over Bool operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
    Implies,
}

impl LogicalOperator {
    pub const ALL: [LogicalOperator; 4] = [Self::And, Self::Or, Self::Not, Self::Implies];

    /// Required operand count, if fixed
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Not => Some(1),
            Self::Implies => Some(2),
            Self::And | Self::Or => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
            Self::Implies => "=>",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    /// Bitwise complement (int only)
    Caret,
    Increment,
    Decrement,
}

impl UnaryOperator {
    pub const ALL: [UnaryOperator; 5] = [
        Self::Plus,
        Self::Minus,
        Self::Caret,
        Self::Increment,
        Self::Decrement,
    ];

    /// Rendered before the operand (PLUS, MINUS, CARET)
    pub fn is_prefix(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Caret)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Caret => "^",
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
