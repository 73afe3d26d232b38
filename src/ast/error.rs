use crate::ast::{Operation, Variable};
use std::fmt;
use thiserror::Error;

/// A name that is not in the operation or variable registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownName {
    #[error("Unknown operation: {0}")]
    Operation(String),
    #[error("Unknown variable: {0}")]
    Variable(String),
}

/// Which kind of leaf showed up where an operator or parenthesis was due.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandKind {
    Variable,
    Number,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Variable => f.write_str("variable"),
            OperandKind::Number => f.write_str("number"),
        }
    }
}

fn shortfall(found: &usize, expected: &usize) -> &'static str {
    if found < expected {
        "Not enough"
    } else {
        "Too much"
    }
}

/// What went wrong while parsing. Positions are 1-based character offsets
/// into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Empty string found!")]
    EmptyInput,

    #[error("An unexpected opening parenthesis found at position {position}!")]
    UnexpectedOpenParen { position: usize },

    #[error("An unexpected closing parenthesis found at position {position}!")]
    UnexpectedCloseParen { position: usize },

    #[error("An unknown token \"{token}\" found at position {position}!")]
    UnknownToken { token: String, position: usize },

    #[error("A {kind} \"{token}\" found at position {position}, but not expected!")]
    OperandWhereOperatorExpected {
        kind: OperandKind,
        token: String,
        position: usize,
    },

    #[error("An operator \"{operation}\" found at position {position}, but not expected!")]
    OperatorWhereOperandExpected {
        operation: Operation,
        position: usize,
    },

    #[error(
        "{} arguments for \"{operation}\" at position {position} found! ({found} instead of {expected})",
        shortfall(.found, .expected)
    )]
    ArityMismatch {
        operation: Operation,
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("A closing parenthesis expected at position {position}!")]
    MissingCloseParen { position: usize },

    #[error("An unexpected token {token} found at position {position}!")]
    TrailingOrUnexpectedToken { token: String, position: usize },

    #[error("Unable to tokenize input: {0}")]
    Tokenize(String),
}

impl ParseErrorKind {
    /// Position the diagnostic points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseErrorKind::EmptyInput | ParseErrorKind::Tokenize(_) => None,
            ParseErrorKind::UnexpectedOpenParen { position }
            | ParseErrorKind::UnexpectedCloseParen { position }
            | ParseErrorKind::UnknownToken { position, .. }
            | ParseErrorKind::OperandWhereOperatorExpected { position, .. }
            | ParseErrorKind::OperatorWhereOperandExpected { position, .. }
            | ParseErrorKind::ArityMismatch { position, .. }
            | ParseErrorKind::MissingCloseParen { position }
            | ParseErrorKind::TrailingOrUnexpectedToken { position, .. } => Some(*position),
        }
    }
}

/// The source line a diagnostic is reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub input: String,
    pub position: usize,
}

impl SourceContext {
    /// The two lines appended under the message: the input itself and the
    /// caret line pointing into it.
    pub fn render(&self) -> String {
        format!("\n{}\n{}", self.input, render_caret(&self.input, self.position))
    }
}

fn render_context(context: &Option<SourceContext>) -> String {
    context.as_ref().map(SourceContext::render).unwrap_or_default()
}

/// Builds a caret line marking the 1-based character `position` of `input`.
///
/// Tabs before the caret are kept so the caret lines up under tab-indented
/// text; every other character becomes a space. Positions past the end of
/// the input are padded with spaces.
pub fn render_caret(input: &str, position: usize) -> String {
    let mut caret: String = input
        .chars()
        .chain(std::iter::repeat(' '))
        .take(position.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    caret.push('^');
    caret
}

/// A terminal parse failure: the message and, when a position is known, the
/// offending source line with a caret under the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", render_context(.context))]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<SourceContext>,
}

impl ParseError {
    /// An error without source context.
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// An error reported against `input`; the caret goes wherever the kind
    /// points.
    pub fn in_source(kind: ParseErrorKind, input: &str) -> Self {
        let context = kind.position().map(|position| SourceContext {
            input: input.to_string(),
            position,
        });
        Self { kind, context }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The first line of the diagnostic, without the source and caret lines.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn position(&self) -> Option<usize> {
        self.kind.position()
    }

    pub fn context(&self) -> Option<&SourceContext> {
        self.context.as_ref()
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        ParseError::new(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluateError {
    #[error("No value supplied for variable \"{variable}\" (index {index}, {supplied} values given)")]
    MissingValue {
        variable: Variable,
        index: usize,
        supplied: usize,
    },

    #[error("Operation \"{operation}\" applied to {found} operands ({expected} expected)")]
    ArityMismatch {
        operation: Operation,
        expected: usize,
        found: usize,
    },
}
