use thiserror::Error;

use crate::error::RuntimeError;

/// Represents all errors that can occur while lexing or parsing source code.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Encountered a token that does not fit the grammar at this position.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// Description of the unexpected token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The input ended in the middle of a construct.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric literal could not be turned into a number.
    #[error("Error on line {line}: {source}.")]
    Literal {
        /// The underlying literal error.
        #[source]
        source: RuntimeError,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A command keyword received an argument it does not understand.
    #[error("Error on line {line}: Unknown mode '{mode}'. Valid modes are b, d, s, h, x, o.")]
    UnknownMode {
        /// The mode as written.
        mode: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Returns `true` when the session must stop after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Literal { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}
