use super::{error::*, lexer::*, postfix::*};
use crate::common::*;
use logos_iter::LogosIter;
use vec1::vec1;

type PResult<T = ()> = Result<T, ParseError>;

/// How many parentheses and call argument lists may be open at once.
pub const MAX_DEPTH: usize = 128;

/// Recursive descent over the token stream, pushing postfix items onto `out` as each
/// grammar rule completes.
pub(crate) struct Parser<'a, 'o> {
    source: &'a str,
    lexer: Lexer<'a>,
    out: &'o mut Vec<PostfixItem>,
    depth: usize,
}

impl<'a, 'o> Parser<'a, 'o> {
    // `or` and `and` share the lowest tier with the additive and comparison operators.
    const LOW_OPS: &'static [TokenKind] = &[
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::LessThan,
        TokenKind::LessEqual,
        TokenKind::GreaterThan,
        TokenKind::GreaterEqual,
        TokenKind::EqualEqual,
        TokenKind::BangEqual,
        TokenKind::Or,
        TokenKind::And,
    ];

    const MULTIPLICATION_OPS: &'static [TokenKind] = &[TokenKind::Star, TokenKind::Slash];

    const POWER_OPS: &'static [TokenKind] = &[TokenKind::Caret];

    pub fn new(source: &'a str, out: &'o mut Vec<PostfixItem>) -> Self {
        Self {
            source,
            lexer: lexer(source),
            out,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> PResult {
        self.parse_expression()?;
        self.expect_end()
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.lexer
            .peek()
            .map_or(false, |peeked| options.contains(peeked))
    }

    fn next_operator(&mut self, options: &[TokenKind]) -> Option<BinaryOperator> {
        if self.matches_any(options) {
            self.advance().and_then(|kind| kind.as_binary_op())
        } else {
            None
        }
    }

    fn consume(&mut self, expected: TokenKind) -> PResult {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(vec1![expected])
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError::new(kind, self.lexer.span(), self.source))
    }

    fn unexpected_token<T>(&mut self, expected: NonEmpty<TokenKind>) -> PResult<T> {
        match self.advance() {
            None => {
                let end = self.source.len();
                Err(ParseError::new(
                    ParseErrorKind::UnexpectedEnd { expected },
                    end..end,
                    self.source,
                ))
            }
            Some(TokenKind::Error) => self.error(ParseErrorKind::UnrecognizedInput),
            Some(found) => self.error(ParseErrorKind::UnexpectedToken { found, expected }),
        }
    }

    fn expect_end(&mut self) -> PResult {
        match self.advance() {
            None => Ok(()),
            Some(TokenKind::Error) => self.error(ParseErrorKind::UnrecognizedInput),
            Some(_) => self.error(ParseErrorKind::TrailingInput),
        }
    }

    fn parse_expression(&mut self) -> PResult {
        self.parse_term()?;

        while let Some(op) = self.next_operator(Self::LOW_OPS) {
            self.parse_term()?;
            self.out.push(PostfixItem::Binary(op));
        }

        Ok(())
    }

    fn parse_term(&mut self) -> PResult {
        self.parse_factor()?;

        while let Some(op) = self.next_operator(Self::MULTIPLICATION_OPS) {
            self.parse_factor()?;
            self.out.push(PostfixItem::Binary(op));
        }

        Ok(())
    }

    fn parse_factor(&mut self) -> PResult {
        self.parse_atom()?;

        // Right-associative: `a ^ b ^ c` is `a b c ^ ^`.
        let mut pending = Vec::new();
        while let Some(op) = self.next_operator(Self::POWER_OPS) {
            self.parse_atom()?;
            pending.push(op);
        }
        self.out
            .extend(pending.into_iter().rev().map(PostfixItem::Binary));

        Ok(())
    }

    /// Parses a nested expression, failing once too many are open.
    fn parse_nested(&mut self) -> PResult {
        if self.depth >= MAX_DEPTH {
            return self.error(ParseErrorKind::TooDeep {
                limit: MAX_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.parse_expression();
        self.depth -= 1;
        result
    }

    fn parse_atom(&mut self) -> PResult {
        if self.matches(TokenKind::Dice) {
            return self.parse_dice();
        }

        let mut prefixed = false;
        let mut negate = false;
        while self.matches_any(Self::LOW_OPS) {
            prefixed = true;
            if self.advance() == Some(TokenKind::Minus) {
                negate = true;
            }
        }

        let next = self.lexer.peek().copied();
        match next {
            Some(TokenKind::Identifier) => self.parse_identifier(),
            Some(TokenKind::Number) => self.parse_number(),
            Some(TokenKind::LeftParen) => self.parse_parens(),
            _ if prefixed => self.unexpected_token(vec1![
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::LeftParen,
            ]),
            _ => self.unexpected_token(vec1![
                TokenKind::Number,
                TokenKind::Dice,
                TokenKind::Identifier,
                TokenKind::LeftParen,
            ]),
        }?;

        if negate {
            self.out.push(PostfixItem::UnaryMinus);
        }
        Ok(())
    }

    fn parse_parens(&mut self) -> PResult {
        self.consume(TokenKind::LeftParen)?;
        self.parse_nested()?;
        self.consume(TokenKind::RightParen)
    }

    fn parse_number(&mut self) -> PResult {
        self.consume(TokenKind::Number)?;
        let text = self.lexer.slice().to_string();
        self.out.push(PostfixItem::literal(text));
        Ok(())
    }

    fn parse_identifier(&mut self) -> PResult {
        self.consume(TokenKind::Identifier)?;
        let name = self.lexer.slice().to_string();

        if self.matches(TokenKind::LeftParen) {
            self.parse_call(name)
        } else {
            self.out.push(PostfixItem::identifier(name));
            Ok(())
        }
    }

    fn parse_call(&mut self, name: String) -> PResult {
        self.consume(TokenKind::LeftParen)?;

        self.parse_nested()?;
        let mut argc = 1;
        while self.matches(TokenKind::Comma) {
            self.advance();
            self.parse_nested()?;
            argc += 1;
        }

        if self.matches(TokenKind::RightParen) {
            self.advance();
        } else {
            return self.unexpected_token(vec1![TokenKind::Comma, TokenKind::RightParen]);
        }

        self.out.push(PostfixItem::call(name, argc));
        Ok(())
    }

    fn parse_dice(&mut self) -> PResult {
        self.consume(TokenKind::Dice)?;
        match dice_from_str(self.lexer.slice()) {
            Some(dice) => {
                self.out.push(PostfixItem::Dice(dice));
                Ok(())
            }
            None => self.error(ParseErrorKind::InvalidDice),
        }
    }
}

fn dice_from_str(s: &str) -> Option<Dice> {
    let (num, sides) = s.split_once(|c: char| c == 'd' || c == 'D')?;
    let num = if num.is_empty() {
        Num::new(1)?
    } else {
        num.parse().ok()?
    };
    let sides = sides.parse().ok()?;
    Some(Dice::new(num, sides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::dice;
    use BinaryOperator::*;

    fn parse(s: &str) -> PResult<Vec<PostfixItem>> {
        let mut out = Vec::new();
        Parser::new(s, &mut out).parse()?;
        Ok(out)
    }

    fn lit(text: &str) -> PostfixItem {
        PostfixItem::literal(text)
    }

    fn bin(op: BinaryOperator) -> PostfixItem {
        PostfixItem::Binary(op)
    }

    fn check(s: &str, expected: Vec<PostfixItem>) {
        let parsed = parse(s).unwrap();
        assert_eq!(parsed, expected, "parsing {:?}", s);
    }

    fn check_err(s: &str, position: usize, expected: ParseErrorKind) {
        let err = parse(s).unwrap_err();
        assert_eq!(err.kind, expected, "parsing {:?}", s);
        assert_eq!(err.position(), position, "parsing {:?}", s);
    }

    #[test]
    fn test_parse_literals() {
        check("32", vec![lit("32")]);
        check("3.25", vec![lit("3.25")]);
        check("1e3", vec![lit("1e3")]);
        check("pi", vec![PostfixItem::identifier("pi")]);
    }

    #[test]
    fn test_parse_precedence() {
        check("1 + 2 * 3", vec![lit("1"), lit("2"), lit("3"), bin(Mul), bin(Add)]);
        check("2^2/4", vec![lit("2"), lit("2"), bin(Pow), lit("4"), bin(Div)]);
        check(
            "1 + 3 == 2 * 2",
            vec![lit("1"), lit("3"), bin(Add), lit("2"), lit("2"), bin(Mul), bin(Eq)],
        );
        check("(1 + 2) * 3", vec![lit("1"), lit("2"), bin(Add), lit("3"), bin(Mul)]);
    }

    #[test]
    fn test_parse_associativity() {
        check("1 - 2 - 3", vec![lit("1"), lit("2"), bin(Sub), lit("3"), bin(Sub)]);
        check("8 / 4 / 2", vec![lit("8"), lit("4"), bin(Div), lit("2"), bin(Div)]);
        check("2^3^2", vec![lit("2"), lit("3"), lit("2"), bin(Pow), bin(Pow)]);
        check(
            "1 or 0 and 1",
            vec![lit("1"), lit("0"), bin(Or), lit("1"), bin(And)],
        );
    }

    #[test]
    fn test_parse_unary() {
        check("-2", vec![lit("2"), PostfixItem::UnaryMinus]);
        check("+2", vec![lit("2")]);
        check("--2", vec![lit("2"), PostfixItem::UnaryMinus]);
        check(
            "-2^2",
            vec![lit("2"), PostfixItem::UnaryMinus, lit("2"), bin(Pow)],
        );
        check(
            "2^-1",
            vec![lit("2"), lit("1"), PostfixItem::UnaryMinus, bin(Pow)],
        );
        check(
            "-(1 + 2)",
            vec![lit("1"), lit("2"), bin(Add), PostfixItem::UnaryMinus],
        );
        check(
            "1 - -sin(0)",
            vec![
                lit("1"),
                lit("0"),
                PostfixItem::call("sin", 1),
                PostfixItem::UnaryMinus,
                bin(Sub),
            ],
        );
    }

    #[test]
    fn test_parse_calls() {
        check(
            "hypot(3, 4)",
            vec![lit("3"), lit("4"), PostfixItem::call("hypot", 2)],
        );
        check(
            "sum(1, 2 * 3, d6)",
            vec![
                lit("1"),
                lit("2"),
                lit("3"),
                bin(Mul),
                PostfixItem::Dice(dice(1, 6)),
                PostfixItem::call("sum", 3),
            ],
        );
        check(
            "round(abs(-1))",
            vec![
                lit("1"),
                PostfixItem::UnaryMinus,
                PostfixItem::call("abs", 1),
                PostfixItem::call("round", 1),
            ],
        );
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", vec![PostfixItem::Dice(dice(1, 20))]);
        check("d20", vec![PostfixItem::Dice(dice(1, 20))]);
        check(
            "3d6 + 2",
            vec![PostfixItem::Dice(dice(3, 6)), lit("2"), bin(Add)],
        );
        check(
            "1 - d4",
            vec![lit("1"), PostfixItem::Dice(dice(1, 4)), bin(Sub)],
        );
    }

    #[test]
    fn test_err_trailing_input() {
        check_err("1+2)", 3, ParseErrorKind::TrailingInput);
        check_err("1 2", 2, ParseErrorKind::TrailingInput);
        check_err("3d6x", 3, ParseErrorKind::TrailingInput);
    }

    #[test]
    fn test_err_unbalanced() {
        check_err(
            "(1+2",
            4,
            ParseErrorKind::UnexpectedEnd {
                expected: vec1![TokenKind::RightParen],
            },
        );
        check_err(
            "max(1, 2",
            8,
            ParseErrorKind::UnexpectedEnd {
                expected: vec1![TokenKind::Comma, TokenKind::RightParen],
            },
        );
    }

    #[test]
    fn test_err_unexpected_token() {
        check_err(
            "-d6",
            1,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::Dice,
                expected: vec1![TokenKind::Number, TokenKind::Identifier, TokenKind::LeftParen],
            },
        );
        check_err(
            "f()",
            2,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::RightParen,
                expected: vec1![
                    TokenKind::Number,
                    TokenKind::Dice,
                    TokenKind::Identifier,
                    TokenKind::LeftParen,
                ],
            },
        );
        check_err(
            "",
            0,
            ParseErrorKind::UnexpectedEnd {
                expected: vec1![
                    TokenKind::Number,
                    TokenKind::Dice,
                    TokenKind::Identifier,
                    TokenKind::LeftParen,
                ],
            },
        );
    }

    #[test]
    fn test_err_bad_input() {
        check_err("1 # 2", 2, ParseErrorKind::UnrecognizedInput);
        check_err("0d6", 0, ParseErrorKind::InvalidDice);
        check_err("2d0", 0, ParseErrorKind::InvalidDice);
    }

    #[test]
    fn test_long_chains() {
        let sum = format!("{}1", "1+".repeat(100_000));
        let items = parse(&sum).unwrap();
        assert_eq!(items.len(), 200_001);
        assert_eq!(items[items.len() - 1], bin(Add));

        let power = format!("{}2", "2^".repeat(100_000));
        let items = parse(&power).unwrap();
        assert_eq!(items[100_000], lit("2"));
        assert!(items[100_001..].iter().all(|item| *item == bin(Pow)));
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_DEPTH;
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        check(&nested(depth), vec![lit("1")]);
        check_err(
            &nested(depth + 1),
            depth,
            ParseErrorKind::TooDeep { limit: depth },
        );
        check_err(
            &nested(10_000),
            depth,
            ParseErrorKind::TooDeep { limit: depth },
        );

        let calls = format!("{}1{}", "abs(".repeat(depth + 1), ")".repeat(depth + 1));
        assert_eq!(
            parse(&calls).unwrap_err().kind,
            ParseErrorKind::TooDeep { limit: depth }
        );
    }
}
