use crate::interpreter::value::{
    core::{DEFAULT_PRECISION, Settings},
    float::MIN_PRECISION,
    format::{DEFAULT_DIGITS, OutputMode},
};

/// Session configuration.
///
/// Collected from the command line by the binary and handed to
/// [`Context::with_output`](crate::interpreter::evaluator::core::Context::with_output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Precision of float results, in bits.
    pub precision: u32,
    /// Significant decimal digits shown for floats.
    pub digits:    usize,
    /// Output mode at start-up.
    pub mode:      OutputMode,
}

impl Default for Config {
    fn default() -> Self {
        Self { precision: DEFAULT_PRECISION,
               digits:    DEFAULT_DIGITS,
               mode:      OutputMode::default(), }
    }
}

impl Config {
    /// Numeric settings derived from this configuration.
    ///
    /// # Example
    /// ```
    /// use mpcalc::{
    ///     config::Config,
    ///     interpreter::value::{float::Rounding, format::OutputMode},
    /// };
    ///
    /// let config = Config { mode: OutputMode::Hex,
    ///                       ..Config::default() };
    /// assert_eq!(config.settings().rounding, Rounding::TowardZero);
    /// ```
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings { precision: self.precision.max(MIN_PRECISION),
                   rounding:  self.mode.rounding(), }
    }
}
