use crate::ast::frame::Frame;
use crate::ast::{
    ExpressionNode, OperandKind, Operation, ParseError, ParseErrorKind, Variable,
};
use log::{debug, trace};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./prefix.pest"] // Link to the grammar file
pub struct PrefixParser;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
    Atom,
}

/// A token and the 1-based character position it starts at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    position: usize,
}

impl Token<'_> {
    /// Position just past the token.
    fn end(&self) -> usize {
        self.position + self.text.chars().count()
    }
}

/// Which token classes may come next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Expectations {
    operand: bool,
    operator: bool,
    open_paren: bool,
}

impl Expectations {
    const START: Self = Self {
        operand: true,
        operator: true,
        open_paren: true,
    };

    // A fresh frame has to start with an operator.
    const AFTER_OPEN: Self = Self {
        operand: false,
        operator: true,
        open_paren: false,
    };

    const AFTER_CLOSE: Self = Self {
        operand: true,
        operator: false,
        open_paren: true,
    };

    const AFTER_OPERATOR: Self = Self {
        operand: true,
        operator: false,
        open_paren: true,
    };

    /// A leaf can only be followed by more operands when something (an
    /// operator or an earlier node) already sits in its frame.
    fn after_leaf(frame_was_empty: bool) -> Self {
        Self {
            operand: !frame_was_empty,
            operator: false,
            open_paren: !frame_was_empty,
        }
    }
}

/// Working state of a single parse: the top-level frame, the stack of
/// frames opened by `(`, and what may come next.
struct ParseState {
    outer: Frame,
    open: Vec<Frame>,
    expect: Expectations,
}

impl ParseState {
    fn new() -> Self {
        Self {
            outer: Frame::default(),
            open: Vec::new(),
            expect: Expectations::START,
        }
    }

    fn current(&mut self) -> &mut Frame {
        self.open.last_mut().unwrap_or(&mut self.outer)
    }

    fn feed(&mut self, token: &Token<'_>) -> Result<(), ParseErrorKind> {
        trace!("Token {:?} with {:?}", token, self.expect);
        match token.kind {
            TokenKind::Open => self.open_frame(token.position),
            TokenKind::Close => self.close_frame(token.position),
            TokenKind::Atom => self.push_atom(token.text, token.position),
        }
    }

    fn open_frame(&mut self, position: usize) -> Result<(), ParseErrorKind> {
        if !self.expect.open_paren {
            return Err(ParseErrorKind::UnexpectedOpenParen { position });
        }
        self.open.push(Frame::opened_at(position));
        self.expect = Expectations::AFTER_OPEN;
        Ok(())
    }

    fn close_frame(&mut self, position: usize) -> Result<(), ParseErrorKind> {
        if self.current().is_empty() {
            return Err(ParseErrorKind::UnexpectedCloseParen { position });
        }
        let frame = self
            .open
            .pop()
            .ok_or(ParseErrorKind::UnexpectedCloseParen { position })?;

        let start = frame.start();
        let node = frame.close(position)?;
        self.current().push_node(node, start);
        self.expect = Expectations::AFTER_CLOSE;
        Ok(())
    }

    fn push_atom(&mut self, text: &str, position: usize) -> Result<(), ParseErrorKind> {
        if let Some(operation) = Operation::resolve(text) {
            if !self.expect.operator {
                return Err(ParseErrorKind::OperatorWhereOperandExpected {
                    operation,
                    position,
                });
            }
            self.current().push_operator(operation, position);
            self.expect = Expectations::AFTER_OPERATOR;
            return Ok(());
        }

        let (kind, node) = match Variable::resolve(text) {
            Some(variable) => (OperandKind::Variable, ExpressionNode::variable(variable)),
            None => (OperandKind::Number, parse_number(text, position)?),
        };
        if !self.expect.operand {
            return Err(ParseErrorKind::OperandWhereOperatorExpected {
                kind,
                token: text.to_string(),
                position,
            });
        }

        let frame = self.current();
        let frame_was_empty = frame.is_empty();
        frame.push_node(node, position);
        self.expect = Expectations::after_leaf(frame_was_empty);
        Ok(())
    }

    /// Checks the state once the input is exhausted; `end` is the position
    /// just past the last token.
    fn finish(self, end: usize) -> Result<ExpressionNode, ParseErrorKind> {
        if !self.open.is_empty() {
            return Err(ParseErrorKind::MissingCloseParen { position: end });
        }
        if self.outer.is_empty() {
            return Err(ParseErrorKind::EmptyInput);
        }
        self.outer.close(end)
    }
}

fn parse_number(text: &str, position: usize) -> Result<ExpressionNode, ParseErrorKind> {
    match text.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(ExpressionNode::constant(value)),
        _ => Err(ParseErrorKind::UnknownToken {
            token: text.to_string(),
            position,
        }),
    }
}

impl PrefixParser {
    /// Parses a prefix-notation expression such as `(+ x (negate 2))` into a
    /// tree.
    ///
    /// The whole input is consumed in a single pass. The first problem found
    /// is reported; there is no recovery.
    pub fn parse_expression(input: &str) -> Result<ExpressionNode, ParseError> {
        debug!("Parsing expression: {}", input);
        if input.trim().is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyInput));
        }

        let tokens = Self::tokenize(input)?;
        let end = tokens.last().map_or(1, Token::end);

        let mut state = ParseState::new();
        for token in &tokens {
            state
                .feed(token)
                .map_err(|kind| ParseError::in_source(kind, input))?;
        }
        let node = state
            .finish(end)
            .map_err(|kind| ParseError::in_source(kind, input))?;

        debug!("Parse result: {}", node.to_prefix_string());
        Ok(node)
    }

    fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
        let pairs = PrefixParser::parse(Rule::tokens, input)
            .map_err(|e| ParseError::new(ParseErrorKind::Tokenize(e.to_string())))?
            .next()
            .ok_or_else(|| {
                ParseError::new(ParseErrorKind::Tokenize(
                    "Failed to tokenize expression".to_string(),
                ))
            })?
            .into_inner();

        // Byte offsets from pest are turned into character positions
        // incrementally, tokens arrive in order.
        let mut tokens = Vec::new();
        let mut byte_cursor = 0;
        let mut char_cursor = 1;
        for pair in pairs {
            let kind = match pair.as_rule() {
                Rule::open => TokenKind::Open,
                Rule::close => TokenKind::Close,
                Rule::atom => TokenKind::Atom,
                _ => continue,
            };
            let start = pair.as_span().start();
            char_cursor += input[byte_cursor..start].chars().count();
            byte_cursor = start;
            tokens.push(Token {
                kind,
                text: pair.as_str(),
                position: char_cursor,
            });
        }

        trace!("Tokens: {:?}", tokens);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Operation, Variable};

    fn constant(value: f64) -> ExpressionNode {
        ExpressionNode::constant(value)
    }

    fn var(variable: Variable) -> ExpressionNode {
        ExpressionNode::variable(variable)
    }

    fn kind_of(input: &str) -> ParseErrorKind {
        PrefixParser::parse_expression(input)
            .unwrap_err()
            .kind()
            .clone()
    }

    #[test]
    fn test_tokenize_isolates_parentheses() {
        let tokens = PrefixParser::tokenize("(+ x(negate 2))").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["(", "+", "x", "(", "negate", "2", ")", ")"]);
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2, 4, 5, 6, 13, 14, 15]);
    }

    #[test]
    fn test_tokenize_handles_mixed_whitespace() {
        let tokens = PrefixParser::tokenize("  (\t*\n x\r\n 3 )  ").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["(", "*", "x", "3", ")"]);
        assert_eq!(tokens[0].position, 3);
        assert_eq!(tokens[4].position, 14);
    }

    #[test]
    fn test_tokenize_counts_characters() {
        let tokens = PrefixParser::tokenize("(ä ö)").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_simple_call() {
        let ast = PrefixParser::parse_expression("(+ 1 2)").unwrap();
        let expected = ExpressionNode::call(Operation::Add, vec![constant(1.0), constant(2.0)]);
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_nested_calls() {
        let ast = PrefixParser::parse_expression("(- (* x y) (negate z))").unwrap();
        let expected = ExpressionNode::call(
            Operation::Subtract,
            vec![
                ExpressionNode::call(Operation::Multiply, vec![var(Variable::X), var(Variable::Y)]),
                ExpressionNode::call(Operation::Negate, vec![var(Variable::Z)]),
            ],
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_operand_after_nested_call() {
        let ast = PrefixParser::parse_expression("(+ (* x y) z)").unwrap();
        assert_eq!(ast.to_prefix_string(), "(+ (* x y) z)");
    }

    #[test]
    fn test_single_leaf() {
        assert_eq!(PrefixParser::parse_expression("x").unwrap(), var(Variable::X));
        assert_eq!(PrefixParser::parse_expression(" 2.5 ").unwrap(), constant(2.5));
        assert_eq!(PrefixParser::parse_expression("-7").unwrap(), constant(-7.0));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(PrefixParser::parse_expression("1e3").unwrap(), constant(1000.0));
        assert_eq!(PrefixParser::parse_expression(".5").unwrap(), constant(0.5));
        assert_eq!(
            PrefixParser::parse_expression("Infinity").unwrap(),
            constant(f64::INFINITY)
        );
    }

    #[test]
    fn test_bare_top_level_call() {
        let ast = PrefixParser::parse_expression("+ x 2").unwrap();
        let expected = ExpressionNode::call(Operation::Add, vec![var(Variable::X), constant(2.0)]);
        assert_eq!(ast, expected);

        let ast = PrefixParser::parse_expression("atan2 (negate 1) x").unwrap();
        assert_eq!(ast.to_prefix_string(), "(atan2 (negate 1) x)");
    }

    #[test]
    fn test_lone_variadic_operator_is_an_empty_call() {
        let ast = PrefixParser::parse_expression("sum").unwrap();
        assert_eq!(ast, ExpressionNode::call(Operation::Sum, vec![]));
    }

    #[test]
    fn test_lone_fixed_operator_is_an_arity_error() {
        assert_eq!(
            kind_of("negate"),
            ParseErrorKind::ArityMismatch {
                operation: Operation::Negate,
                position: 7,
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn test_variadic_calls() {
        let ast = PrefixParser::parse_expression("(sum)").unwrap();
        assert_eq!(ast, ExpressionNode::call(Operation::Sum, vec![]));

        let ast = PrefixParser::parse_expression("(min3 1 2 3 4 5 6)").unwrap();
        assert_eq!(ast.operands().len(), 6);

        let ast = PrefixParser::parse_expression("(max5 x)").unwrap();
        assert_eq!(ast.operands().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kind_of(""), ParseErrorKind::EmptyInput);
        assert_eq!(kind_of("   \t "), ParseErrorKind::EmptyInput);
        assert!(PrefixParser::parse_expression("").unwrap_err().context().is_none());
    }

    #[test]
    fn test_not_enough_arguments() {
        let error = PrefixParser::parse_expression("(+ 1)").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::ArityMismatch {
                operation: Operation::Add,
                position: 5,
                expected: 2,
                found: 1,
            }
        );
        assert_eq!(
            error.to_string(),
            "Not enough arguments for \"+\" at position 5 found! (1 instead of 2)\n(+ 1)\n    ^"
        );
    }

    #[test]
    fn test_too_much_arguments() {
        assert_eq!(
            kind_of("(negate 1 2)"),
            ParseErrorKind::ArityMismatch {
                operation: Operation::Negate,
                position: 12,
                expected: 1,
                found: 2,
            }
        );
        assert_eq!(
            kind_of("+ 1 2 3"),
            ParseErrorKind::ArityMismatch {
                operation: Operation::Add,
                position: 8,
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn test_missing_close_paren() {
        let error = PrefixParser::parse_expression("(+ 1 2").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::MissingCloseParen { position: 7 }
        );
        assert_eq!(
            error.to_string(),
            "A closing parenthesis expected at position 7!\n(+ 1 2\n      ^"
        );
    }

    #[test]
    fn test_unexpected_close_paren() {
        assert_eq!(
            kind_of("(+ 1 2))"),
            ParseErrorKind::UnexpectedCloseParen { position: 8 }
        );
        assert_eq!(kind_of("()"), ParseErrorKind::UnexpectedCloseParen { position: 2 });
        assert_eq!(kind_of(")"), ParseErrorKind::UnexpectedCloseParen { position: 1 });
        assert_eq!(kind_of("x )"), ParseErrorKind::UnexpectedCloseParen { position: 3 });
    }

    #[test]
    fn test_unexpected_open_paren() {
        assert_eq!(kind_of("((+ 1 2))"), ParseErrorKind::UnexpectedOpenParen { position: 2 });
        assert_eq!(kind_of("1 (+ 1 2)"), ParseErrorKind::UnexpectedOpenParen { position: 3 });
    }

    #[test]
    fn test_unknown_token() {
        let error = PrefixParser::parse_expression("(+ 1 w)").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::UnknownToken {
                token: "w".to_string(),
                position: 6,
            }
        );
        assert_eq!(
            error.to_string(),
            "An unknown token \"w\" found at position 6!\n(+ 1 w)\n     ^"
        );
        assert_eq!(
            kind_of("NaN"),
            ParseErrorKind::UnknownToken {
                token: "NaN".to_string(),
                position: 1,
            }
        );
    }

    #[test]
    fn test_operator_where_operand_expected() {
        assert_eq!(
            kind_of("(+ - 1 2)"),
            ParseErrorKind::OperatorWhereOperandExpected {
                operation: Operation::Subtract,
                position: 4,
            }
        );
        assert_eq!(
            kind_of("1 + 2"),
            ParseErrorKind::OperatorWhereOperandExpected {
                operation: Operation::Add,
                position: 3,
            }
        );
    }

    #[test]
    fn test_operand_where_operator_expected() {
        assert_eq!(
            kind_of("(x)"),
            ParseErrorKind::OperandWhereOperatorExpected {
                kind: OperandKind::Variable,
                token: "x".to_string(),
                position: 2,
            }
        );
        assert_eq!(
            kind_of("x 1"),
            ParseErrorKind::OperandWhereOperatorExpected {
                kind: OperandKind::Number,
                token: "1".to_string(),
                position: 3,
            }
        );
    }

    #[test]
    fn test_trailing_token() {
        let error = PrefixParser::parse_expression("(+ 1 2) x").unwrap_err();
        assert_eq!(
            error.kind(),
            &ParseErrorKind::TrailingOrUnexpectedToken {
                token: "x".to_string(),
                position: 9,
            }
        );
        assert_eq!(
            error.to_string(),
            "An unexpected token x found at position 9!\n(+ 1 2) x\n        ^"
        );

        assert_eq!(
            kind_of("(+ 1 2) (- 3 4)"),
            ParseErrorKind::TrailingOrUnexpectedToken {
                token: "3 4 -".to_string(),
                position: 9,
            }
        );
    }

    #[test]
    fn test_trailing_tokens_report_the_last_one() {
        let error = PrefixParser::parse_expression("(+ 1 2) 3 4").unwrap_err();
        assert_eq!(
            error.to_string(),
            "An unexpected token 4 found at position 11!\n(+ 1 2) 3 4\n          ^"
        );
        assert_eq!(
            kind_of("(+ 1 2) 3 (- 4 5)"),
            ParseErrorKind::TrailingOrUnexpectedToken {
                token: "4 5 -".to_string(),
                position: 11,
            }
        );
    }

    #[test]
    fn test_caret_keeps_tabs_in_diagnostics() {
        let error = PrefixParser::parse_expression("\t(+\t1 q)").unwrap_err();
        assert_eq!(error.to_string().lines().count(), 3);
        assert!(error.to_string().ends_with("\n\t(+\t1 q)\n\t  \t  ^"));
    }
}
