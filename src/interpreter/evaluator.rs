/// Arithmetic, bitwise and comparison operators.
///
/// Handles the promotion between integers and floats for every two-operand
/// operator.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, bitwise complement, factorial and part-select.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context and the result
/// type shared by every evaluation function.
pub mod core;

/// Sequencing, conditionals and loops.
pub mod flow;

/// Top-level statements.
///
/// Evaluates statements, stores `ans`, runs session commands and exposes the
/// variable and function listings.
pub mod statement;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;
