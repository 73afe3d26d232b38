//! Prefix-notation arithmetic: `(+ x (negate 2))` is parsed into an
//! [`ExpressionNode`] tree and evaluated against the variables `x`, `y`
//! and `z`.

pub mod ast;
pub mod functions;

use ast::{EvaluateError, ParseError};
use thiserror::Error;

pub use ast::{
    Arity, Evaluator, ExpressionNode, Operation, ParseErrorKind, Parser, Variable,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}

/// Parses a prefix expression into a tree.
pub fn parse_prefix(expression: &str) -> Result<ExpressionNode, ParseError> {
    Parser::parse_expression(expression)
}

pub fn evaluate_expression(expression: &str, values: &[f64]) -> Result<f64, Error> {
    let ast = Parser::parse_expression(expression)?;
    Ok(ast.evaluate(values)?)
}
