//! # mpcalc
//!
//! mpcalc is an arbitrary-precision calculator language written in Rust.
//! Integers are exact and unbounded; floats carry a configurable number of
//! mantissa bits. The language has variables, user-defined functions,
//! conditionals and loops, bit-field extraction, and a library of
//! transcendental and number-theoretic builtins.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::Error,
    interpreter::{evaluator::core::Context, value::core::Num},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the parser
/// and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Owns every child node exactly once, so dropping a tree frees it.
pub mod ast;
/// Session configuration.
///
/// Precision, displayed digits and the initial output mode, as chosen on the
/// command line.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing, or
/// evaluating code. It standardizes error reporting and carries detailed
/// information about failures, including error kinds, descriptions, and source
/// locations for debugging and user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Marks the errors after which a session must stop.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and the numeric
/// value types to provide a complete runtime for calculator sessions.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Lifetime-grouped storage for numbers.
pub mod memory;
/// Symbol tables.
///
/// A separately chained hash table and the variable and function tables
/// built on it.
pub mod table;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are used
/// throughout the interpreter, parser, and evaluator.
///
/// # Responsibilities
/// - Safely convert between `u64`, `u32`, and `usize` without silent data
///   loss.
/// - Provide big-integer helpers used in multiple modules.
pub mod util;

/// Runs a whole script and returns the value of its last expression.
///
/// This function parses and executes all statements in the provided source
/// string in a fresh session with the default configuration. Per-statement
/// results are discarded; with `auto_print` the final value is printed to
/// standard output.
///
/// # Errors
/// Returns an error if lexing, parsing or evaluation fails.
///
/// # Examples
/// ```
/// use mpcalc::{get_result, interpreter::value::core::Num};
///
/// // Simple expression: the result will be calculated and no error should occur.
/// let res = get_result("result = 2 + 2", false);
/// assert_eq!(res.unwrap(), Some(Num::from(4)));
///
/// // Example with an intentional error (unknown variable).
/// let res = get_result("y = x + 1", false); // 'x' is not defined
/// assert!(res.is_err());
/// ```
pub fn get_result(source: &str, auto_print: bool) -> Result<Option<Num>, Error> {
    let mut context = Context::silent();
    let result = context.run_source(source)?;

    if auto_print && let Some(value) = &result {
        println!("{}", context.format(value));
    }

    Ok(result)
}
