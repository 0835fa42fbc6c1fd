use super::lexer::TokenKind;
use crate::common::NonEmpty;
use std::fmt;
use std::ops::Range;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("syntax error at position {} ({slice:?}): {kind}; unconsumed input {remainder:?}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
    pub remainder: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, span: Range<usize>, source: &str) -> Self {
        let slice = source.get(span.clone()).unwrap_or_default().to_string();
        let remainder = source.get(span.start..).unwrap_or_default().to_string();
        Self {
            kind,
            span,
            slice,
            remainder,
        }
    }

    pub fn position(&self) -> usize {
        self.span.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: TokenKind,
        expected: NonEmpty<TokenKind>,
    },
    UnexpectedEnd {
        expected: NonEmpty<TokenKind>,
    },
    UnrecognizedInput,
    TrailingInput,
    InvalidDice,
    TooDeep {
        limit: usize,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected token: found {}, expected {}", found, expected.fmt_expected())
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected {}", expected.fmt_expected())
            }
            Self::UnrecognizedInput => f.write_str("unrecognized input"),
            Self::TrailingInput => f.write_str("expected end of input"),
            Self::InvalidDice => {
                f.write_str("invalid dice literal; count and sides must be positive")
            }
            Self::TooDeep { limit } => {
                write!(f, "expression nested more than {} levels deep", limit)
            }
        }
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [TokenKind] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => String::new(),
            [a] => a.to_string(),
            [a, b] => format!("{} or {}", a, b),
            s => {
                let head: Vec<_> = s[..s.len() - 1].iter().map(|k| k.as_str()).collect();
                format!("{}, or {}", head.join(", "), s[s.len() - 1])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vec1::vec1;

    #[test]
    fn test_format_expected() {
        let kind = ParseErrorKind::UnexpectedEnd {
            expected: vec1![TokenKind::RightParen],
        };
        assert_eq!(kind.to_string(), "unexpected end of input, expected ')'");

        let kind = ParseErrorKind::UnexpectedToken {
            found: TokenKind::Comma,
            expected: vec1![TokenKind::Identifier, TokenKind::Number, TokenKind::LeftParen],
        };
        assert_eq!(
            kind.to_string(),
            "unexpected token: found ',', expected <identifier>, <number>, or '('"
        );
    }

    #[test]
    fn test_error_carries_remainder() {
        let err = ParseError::new(ParseErrorKind::TrailingInput, 3..4, "1+2)");
        assert_eq!(err.position(), 3);
        assert_eq!(err.slice, ")");
        assert_eq!(err.remainder, ")");
    }
}
