//! A small expression language with arithmetic, comparisons, function calls and dice.
//!
//! ```
//! # use parsemath::Value;
//! assert_eq!(parsemath::evaluate("round(2/3)").unwrap(), Value::Int(1));
//! ```

mod common;
mod error;
pub mod eval;
pub mod parse;

pub use common::{BinaryOperator, Dice, Float, Int};
pub use error::{Error, Result};
pub use eval::{Evaluator, Value};

/// Evaluates a single expression with a fresh default [Evaluator].
pub fn evaluate(expression: &str) -> Result<Value> {
    Evaluator::new().eval(expression)
}
