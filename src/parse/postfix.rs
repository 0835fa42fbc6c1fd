use crate::common::*;
use std::fmt;

/// One element of the postfix sequence emitted by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum PostfixItem {
    Operand(Operand),
    Binary(BinaryOperator),
    /// Negates the value reduced from the items before it.
    UnaryMinus,
    Call(FunctionCall),
    /// Rolled when reduced, never at parse time.
    Dice(Dice),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Numeric literal text, converted during evaluation.
    Literal(String),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub argc: usize,
}

impl PostfixItem {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Operand(Operand::Literal(text.into()))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Operand(Operand::Identifier(name.into()))
    }

    pub fn call(name: impl Into<String>, argc: usize) -> Self {
        Self::Call(FunctionCall {
            name: name.into(),
            argc,
        })
    }
}

impl fmt::Display for PostfixItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(Operand::Literal(text)) => f.write_str(text),
            Self::Operand(Operand::Identifier(name)) => f.write_str(name),
            Self::Binary(op) => fmt::Display::fmt(op, f),
            Self::UnaryMinus => f.write_str("neg"),
            Self::Call(call) => write!(f, "{}/{}", call.name, call.argc),
            Self::Dice(dice) => fmt::Display::fmt(dice, f),
        }
    }
}
