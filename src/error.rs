use crate::eval::Arity;
use crate::parse::ParseError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Syntax(#[from] ParseError),
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
    #[error("{name}() takes {expected}, but {found} were given")]
    ArgumentCount {
        name: String,
        expected: Arity,
        found: usize,
    },
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("math domain error: {0}")]
    Domain(String),
    #[error("too many dice rolled")]
    TooManyRolls,
    #[error("invalid numeric literal {0:?}")]
    InvalidLiteral(String),
    /// The postfix sequence did not reduce to exactly one value. Parser output never
    /// triggers this.
    #[error("internal error: malformed postfix sequence")]
    MalformedStack,
}

impl Error {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub(crate) fn argument_count(name: impl ToString, expected: Arity, found: usize) -> Self {
        Self::ArgumentCount {
            name: name.to_string(),
            expected,
            found,
        }
    }
}
