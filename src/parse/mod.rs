mod error;
mod lexer;
mod parser;
mod postfix;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::TokenKind;
pub use parser::MAX_DEPTH;
pub use postfix::{FunctionCall, Operand, PostfixItem};

/// Parses an expression into its postfix sequence.
///
/// # Examples
/// ```
/// # use parsemath::parse::{parse, PostfixItem};
/// let items = parse("1 + 2").unwrap();
/// assert_eq!(items.len(), 3);
/// assert!(matches!(items[2], PostfixItem::Binary(_)));
/// ```
pub fn parse(s: &str) -> Result<Vec<PostfixItem>, ParseError> {
    let mut out = Vec::new();
    parse_into(s, &mut out)?;
    Ok(out)
}

pub(crate) fn parse_into(s: &str, out: &mut Vec<PostfixItem>) -> Result<(), ParseError> {
    parser::Parser::new(s, out).parse()
}
