use rayon::prelude::*;
use std::fmt;

mod error;
mod evaluator;
mod frame;
mod operation;
mod parser;
mod variable;

pub use error::*;
pub use evaluator::*;
pub use operation::{Arity, Operation};
pub use parser::PrefixParser as Parser;
pub use variable::Variable;

/// A parsed expression. Every node owns its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Constant(f64),
    Variable(Variable),
    Operation {
        operation: Operation,
        operands: Vec<ExpressionNode>,
    },
}

/// Formats a literal the way it is written back out. Infinities use the
/// spelling the parser accepts, negative zero prints as `0`, and magnitudes
/// of at least 1e21 or below 1e-6 switch to exponent form (`1e+21`, `1e-7`).
fn format_number(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    value.to_string()
}

impl ExpressionNode {
    pub fn constant(value: f64) -> Self {
        ExpressionNode::Constant(value)
    }

    pub fn variable(variable: Variable) -> Self {
        ExpressionNode::Variable(variable)
    }

    /// Builds an operation node. The operand count is not checked here;
    /// [`ExpressionNode::evaluate`] rejects a mismatch.
    pub fn call(operation: Operation, operands: Vec<ExpressionNode>) -> Self {
        ExpressionNode::Operation {
            operation,
            operands,
        }
    }

    /// Display name of this node: the literal, the variable name or the
    /// operation symbol.
    pub fn name(&self) -> String {
        match self {
            ExpressionNode::Constant(value) => format_number(*value),
            ExpressionNode::Variable(variable) => variable.name().to_string(),
            ExpressionNode::Operation { operation, .. } => operation.symbol().to_string(),
        }
    }

    pub fn operands(&self) -> &[ExpressionNode] {
        match self {
            ExpressionNode::Operation { operands, .. } => operands,
            _ => &[],
        }
    }

    /// Evaluates the tree with `values[i]` bound to the variable of index `i`.
    ///
    /// Only a variable whose index lies past the end of `values` fails;
    /// division by zero and friends follow IEEE-754.
    pub fn evaluate(&self, values: &[f64]) -> Result<f64, EvaluateError> {
        match self {
            ExpressionNode::Constant(value) => Ok(*value),

            ExpressionNode::Variable(variable) => values
                .get(variable.index())
                .copied()
                .ok_or(EvaluateError::MissingValue {
                    variable: *variable,
                    index: variable.index(),
                    supplied: values.len(),
                }),

            ExpressionNode::Operation {
                operation,
                operands,
            } => {
                operation.arity().check(operands.len()).map_err(|expected| {
                    EvaluateError::ArityMismatch {
                        operation: *operation,
                        expected,
                        found: operands.len(),
                    }
                })?;

                let arguments = operands
                    .iter()
                    .map(|operand| operand.evaluate(values))
                    .collect::<Result<Vec<f64>, _>>()?;
                Ok(operation.apply(&arguments))
            }
        }
    }

    /// Evaluates the tree once per row of `rows`, in parallel. Results keep
    /// the order of the rows; the first failure aborts the batch.
    pub fn evaluate_batch<V>(&self, rows: &[V]) -> Result<Vec<f64>, EvaluateError>
    where
        V: AsRef<[f64]> + Sync,
    {
        rows.par_iter()
            .map(|row| self.evaluate(row.as_ref()))
            .collect()
    }

    /// Fully parenthesized prefix form, e.g. `(+ x (negate 2))`.
    ///
    /// A call without operands keeps a space before its closing
    /// parenthesis: `(sum )`.
    pub fn to_prefix_string(&self) -> String {
        match self {
            ExpressionNode::Operation {
                operation,
                operands,
            } => {
                if operands.is_empty() {
                    format!("({} )", operation)
                } else {
                    let operands: Vec<String> =
                        operands.iter().map(ExpressionNode::to_prefix_string).collect();
                    format!("({} {})", operation, operands.join(" "))
                }
            }
            leaf => leaf.name(),
        }
    }
}

/// Operands first, then the node's own name, space separated at every level:
/// `(+ x (negate 2))` prints as `x 2 negate +`.
impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Constant(value) => f.write_str(&format_number(*value)),
            ExpressionNode::Variable(variable) => write!(f, "{}", variable),
            ExpressionNode::Operation {
                operation,
                operands,
            } => {
                for operand in operands {
                    write!(f, "{} ", operand)?;
                }
                write!(f, "{}", operation)
            }
        }
    }
}
