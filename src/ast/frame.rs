use crate::ast::{ExpressionNode, Operation, ParseErrorKind};

/// One entry of a parse frame: an operator whose node is not built yet, or
/// a finished sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FrameItem {
    PendingOperator {
        operation: Operation,
        position: usize,
    },
    Built {
        node: ExpressionNode,
        position: usize,
    },
}

impl FrameItem {
    fn position(&self) -> usize {
        match self {
            FrameItem::PendingOperator { position, .. } | FrameItem::Built { position, .. } => {
                *position
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            FrameItem::PendingOperator { operation, .. } => operation.to_string(),
            FrameItem::Built { node, .. } => node.to_string(),
        }
    }
}

/// Everything collected between a `(` and its matching `)`, or at the top
/// level of the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Frame {
    items: Vec<FrameItem>,
    opened_at: usize,
}

impl Frame {
    pub(crate) fn opened_at(position: usize) -> Self {
        Self {
            items: Vec::new(),
            opened_at: position,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the `(` that opened this frame.
    pub(crate) fn start(&self) -> usize {
        self.opened_at
    }

    pub(crate) fn push_operator(&mut self, operation: Operation, position: usize) {
        self.items
            .push(FrameItem::PendingOperator { operation, position });
    }

    pub(crate) fn push_node(&mut self, node: ExpressionNode, position: usize) {
        self.items.push(FrameItem::Built { node, position });
    }

    /// Collapses the frame into a single node.
    ///
    /// A frame led by an operator becomes a call of that operator on the
    /// remaining items; `position` is where the frame ends and is what an
    /// arity diagnostic points at. Any other frame must hold exactly one
    /// finished node, which is returned as is; otherwise the last excess
    /// item is reported.
    pub(crate) fn close(self, position: usize) -> Result<ExpressionNode, ParseErrorKind> {
        let mut items = self.items.into_iter();
        match items.next() {
            None => Err(ParseErrorKind::EmptyInput),
            Some(FrameItem::PendingOperator { operation, .. }) => {
                let operands = items
                    .map(|item| match item {
                        FrameItem::Built { node, .. } => Ok(node),
                        FrameItem::PendingOperator {
                            operation,
                            position,
                        } => Err(ParseErrorKind::OperatorWhereOperandExpected {
                            operation,
                            position,
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                operation.arity().check(operands.len()).map_err(|expected| {
                    ParseErrorKind::ArityMismatch {
                        operation,
                        position,
                        expected,
                        found: operands.len(),
                    }
                })?;

                Ok(ExpressionNode::call(operation, operands))
            }
            Some(FrameItem::Built { node, .. }) => match items.last() {
                None => Ok(node),
                Some(extra) => Err(ParseErrorKind::TrailingOrUnexpectedToken {
                    token: extra.describe(),
                    position: extra.position(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Variable;

    #[test]
    fn test_close_builds_call() {
        let mut frame = Frame::opened_at(1);
        frame.push_operator(Operation::Add, 2);
        frame.push_node(ExpressionNode::constant(1.0), 4);
        frame.push_node(ExpressionNode::variable(Variable::X), 6);

        let node = frame.close(7).unwrap();
        assert_eq!(
            node,
            ExpressionNode::call(
                Operation::Add,
                vec![
                    ExpressionNode::constant(1.0),
                    ExpressionNode::variable(Variable::X)
                ]
            )
        );
    }

    #[test]
    fn test_close_checks_exact_arity() {
        let mut frame = Frame::opened_at(1);
        frame.push_operator(Operation::Negate, 2);

        assert_eq!(
            frame.close(9),
            Err(ParseErrorKind::ArityMismatch {
                operation: Operation::Negate,
                position: 9,
                expected: 1,
                found: 0,
            })
        );
    }

    #[test]
    fn test_close_variadic_with_no_operands() {
        let mut frame = Frame::opened_at(1);
        frame.push_operator(Operation::Sum, 2);

        assert_eq!(
            frame.close(5),
            Ok(ExpressionNode::call(Operation::Sum, vec![]))
        );
    }

    #[test]
    fn test_close_group_unwraps_single_node() {
        let mut frame = Frame::opened_at(1);
        frame.push_node(ExpressionNode::constant(2.5), 2);

        assert_eq!(frame.close(5), Ok(ExpressionNode::constant(2.5)));
    }

    #[test]
    fn test_close_group_rejects_extra_items() {
        let mut frame = Frame::opened_at(1);
        frame.push_node(ExpressionNode::constant(2.0), 1);
        frame.push_node(ExpressionNode::variable(Variable::Y), 3);
        frame.push_node(ExpressionNode::variable(Variable::Z), 5);

        assert_eq!(
            frame.close(6),
            Err(ParseErrorKind::TrailingOrUnexpectedToken {
                token: "z".to_string(),
                position: 5,
            })
        );
    }
}
