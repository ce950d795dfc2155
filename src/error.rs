use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include syntax mistakes, unexpected tokens and malformed
/// numeric literals.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include unknown names, arity mismatches, division by zero,
/// domain errors and values that do not fit into a machine word.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error produced while running source text.
#[derive(Debug, Error)]
pub enum Error {
    /// The text could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A statement failed during evaluation.
    #[error("Error on line {line}: {source}.")]
    Runtime {
        /// The failure.
        #[source]
        source: RuntimeError,
        /// Line of the statement that failed.
        line:   usize,
    },
}

impl Error {
    /// Returns `true` when the session must stop after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Parse(e) => e.is_fatal(),
            Self::Runtime { source, .. } => source.is_fatal(),
        }
    }
}
