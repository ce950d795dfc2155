/// Function dispatch and the builtin table.
///
/// Looks functions up, checks their arity and routes the call to a builtin
/// primitive, a raw builtin or a user-defined body.
pub mod core;
/// Float builtins and the primitive dispatcher.
///
/// Converts evaluated arguments to the representation a primitive expects
/// and wraps the rounding functions.
pub mod builtin;
/// Integer builtins.
///
/// Primes, divisibility, binomials, Fibonacci numbers, modular inverses and
/// bit counts.
pub mod integer;
/// `min`, `max` and `avg`.
pub mod aggregate;
/// `sum`, `prod` and `tab`, which receive their argument expressions
/// unevaluated.
pub mod tabulate;
