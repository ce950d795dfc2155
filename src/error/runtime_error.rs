use thiserror::Error;

use crate::memory::pool::PoolError;

/// Represents all errors that can occur during evaluation and runtime.
///
/// Every variant except [`RuntimeError::UnknownSuffix`] and
/// [`RuntimeError::Internal`] is recoverable: the statement that raised it is
/// abandoned and the session continues.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Tried to read a variable that is bound in no scope.
    #[error("Unknown variable '{name}'")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
    },
    /// Called a function that is not in the function table.
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// The name of the function.
        name: String,
    },
    /// A function with a fixed arity received the wrong number of arguments.
    #[error("Function '{name}' takes exactly {expected} arguments")]
    ArityExact {
        /// The name of the function.
        name:     String,
        /// The only accepted argument count.
        expected: usize,
    },
    /// A variadic function received too few or too many arguments.
    #[error("Function '{name}' takes a minimum of {min} and a maximum of {max} arguments")]
    ArityRange {
        /// The name of the function.
        name: String,
        /// Smallest accepted argument count.
        min:  usize,
        /// Largest accepted argument count.
        max:  usize,
    },
    /// A value had to fit into an unsigned machine word but did not.
    #[error("{what} needs to fit into an unsigned long")]
    NotRepresentable {
        /// Which operand was out of range.
        what: String,
    },
    /// Part-select bounds were negative, inverted or too large.
    #[error("Invalid part-select: {details}")]
    InvalidPartSelect {
        /// Details about the offending bound.
        details: String,
    },
    /// Attempted division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// A mathematical function was applied outside of its domain.
    #[error("Domain error in '{function}': {details}")]
    Domain {
        /// The function or operator that rejected its input.
        function: String,
        /// What was wrong with the input.
        details:  String,
    },
    /// An argument was invalid for reasons other than its numeric domain.
    #[error("Invalid argument: {details}")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
    },
    /// A floating-point result left the supported exponent range.
    #[error("Overflow: {details}")]
    Overflow {
        /// Details about the overflowing computation.
        details: String,
    },
    /// A numeric literal contained digits that are invalid for its base.
    #[error("Invalid numeric literal '{literal}'")]
    InvalidLiteral {
        /// The literal as written.
        literal: String,
    },
    /// A numeric literal carried a suffix outside the SI multiplier set.
    #[error("Unknown suffix '{suffix}' in numeric literal '{literal}'")]
    UnknownSuffix {
        /// The literal as written.
        literal: String,
        /// The unrecognised suffix.
        suffix:  char,
    },
    /// The number pool rejected a handle; evaluation state is inconsistent.
    #[error("Internal error: {0}")]
    Internal(#[from] PoolError),
    /// Writing a result to the output stream failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns `true` for errors after which the session must not continue.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownSuffix { .. } | Self::Internal(_))
    }

    /// Builds the error raised when `function` receives `args` arguments
    /// outside of `min..=max`.
    #[must_use]
    pub fn arity(function: &str, min: usize, max: usize) -> Self {
        if min == max {
            Self::ArityExact { name:     function.to_string(),
                               expected: min, }
        } else {
            Self::ArityRange { name: function.to_string(),
                               min,
                               max }
        }
    }

    /// Shorthand for a [`RuntimeError::Domain`] error.
    #[must_use]
    pub fn domain(function: &str, details: &str) -> Self {
        Self::Domain { function: function.to_string(),
                       details:  details.to_string(), }
    }

    /// Shorthand for a [`RuntimeError::NotRepresentable`] error.
    #[must_use]
    pub fn not_representable(what: impl Into<String>) -> Self {
        Self::NotRepresentable { what: what.into() }
    }
}
