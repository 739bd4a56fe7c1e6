//! Parse errors
//!
//! The grammar reports failures as chumsky errors over character spans.
//! [`ParseError`] turns the furthest of those into one error with a
//! 1-based line and column, suitable for showing to a user.

use chumsky::error::{Simple, SimpleReason};
use std::fmt;

use crate::soy::ast::SourceLocation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input did not match the grammar
    Unexpected { expected: Vec<String>, found: String },
    /// A block command was still open at end of input
    Unterminated { command: String },
    /// A construct was recognised but rejected (e.g. a map key that is not a string)
    Invalid { message: String },
    /// Block or bracket nesting went past the configured limit
    TooDeep { limit: usize },
}

/// A single parse failure; `line` and `column` are 1-based, `offset` counts characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn at(location: &SourceLocation, offset: usize, kind: ParseErrorKind) -> Self {
        let position = location.offset_to_position(offset);
        Self {
            kind,
            line: position.line + 1,
            column: position.column + 1,
            offset: position.index,
        }
    }

    /// Pick the error that got furthest into the input
    pub(crate) fn from_simple(
        source: &str,
        location: &SourceLocation,
        errors: Vec<Simple<char>>,
    ) -> Self {
        let Some(error) = errors.into_iter().max_by_key(|e| e.span().start) else {
            return Self::at(
                location,
                0,
                ParseErrorKind::Invalid {
                    message: "parse failed".to_string(),
                },
            );
        };

        match error.reason() {
            SimpleReason::Unclosed { span, .. } => Self::at(
                location,
                span.start,
                ParseErrorKind::Unterminated {
                    command: command_at(source, span.start),
                },
            ),
            SimpleReason::Custom(message) => Self::at(
                location,
                error.span().start,
                ParseErrorKind::Invalid {
                    message: message.clone(),
                },
            ),
            SimpleReason::Unexpected => {
                let mut expected: Vec<String> = error.expected().map(describe).collect();
                expected.sort();
                expected.dedup();
                Self::at(
                    location,
                    error.span().start,
                    ParseErrorKind::Unexpected {
                        expected,
                        found: describe(&error.found().copied()),
                    },
                )
            }
        }
    }

    pub fn is_unterminated(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Unterminated { .. })
    }
}

fn describe(token: &Option<char>) -> String {
    match token {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

/// The command name in the tag starting at `offset`
fn command_at(source: &str, offset: usize) -> String {
    let name: String = source
        .chars()
        .skip(offset)
        .skip_while(|c| *c == '{')
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '@')
        .collect();

    if name.is_empty() {
        "{".to_string()
    } else {
        name
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: ", self.line, self.column)?;
        match &self.kind {
            ParseErrorKind::Unexpected { expected, found } => {
                write!(f, "unexpected {}", found)?;
                match expected.as_slice() {
                    [] => Ok(()),
                    [only] => write!(f, ", expected {}", only),
                    many => write!(f, ", expected one of {}", many.join(", ")),
                }
            }
            ParseErrorKind::Unterminated { command } => write!(
                f,
                "unterminated {{{}}}: no matching {{/{}}} before end of input",
                command, command
            ),
            ParseErrorKind::Invalid { message } => write!(f, "{}", message),
            ParseErrorKind::TooDeep { limit } => {
                write!(f, "nesting exceeds the maximum depth of {}", limit)
            }
        }
    }
}

impl std::error::Error for ParseError {}
