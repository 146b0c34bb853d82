use std::fmt;

use crate::error::GoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SgfError {
    /// A `(` or `[` never closed, or a `)` with nothing open. `pos` is the
    /// byte offset of the offending brace.
    Unmatched { brace: char, pos: usize },
    InvalidPropertyValue {
        property: String,
        value: String,
        reason: String,
    },
    Board(GoError),
}

impl fmt::Display for SgfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SgfError::Unmatched { brace, pos } => {
                write!(f, "unmatched '{brace}' at position {pos}")
            }
            SgfError::InvalidPropertyValue {
                property,
                value,
                reason,
            } => write!(
                f,
                "invalid value '{value}' for property {property}: {reason}"
            ),
            SgfError::Board(e) => write!(f, "cannot replay game record: {e}"),
        }
    }
}

impl std::error::Error for SgfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SgfError::Board(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GoError> for SgfError {
    fn from(e: GoError) -> Self {
        SgfError::Board(e)
    }
}
