/// Expression entry point and the control constructs.
///
/// Defines `ParseResult`, the `;` sequence and assignment levels, and the
/// `if`, `while` and brace-block forms.
pub mod core;

/// Unary, power and postfix parsing.
///
/// Handles prefix `-` and `~`, right-associative `**`, factorial and bit
/// selection, down to primary expressions and calls.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the comparison, bitwise, shift, additive and multiplicative
/// precedence levels.
pub mod binary;

/// Utility functions for the parser.
///
/// Provides list parsing, identifier and token expectations, and line
/// tracking shared by the other parser modules.
pub mod utils;

/// Statement parsing.
///
/// Recognizes session commands, function definitions and expression
/// statements.
pub mod statement;
