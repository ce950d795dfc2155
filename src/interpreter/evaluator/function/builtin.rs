use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::{Num, Settings},
            float::{Float, Rounding},
        },
    },
    table::funcs::Primitive,
};

impl Primitive {
    /// Runs the primitive on evaluated arguments.
    ///
    /// Float primitives receive their arguments converted to floats and
    /// produce a result at the session precision. Integer primitives receive
    /// their arguments rounded to integers; word-sized arguments must fit an
    /// unsigned 64-bit word. Aggregates receive the numbers as they are.
    ///
    /// # Parameters
    /// - `name`: Name the function was called by, for error messages.
    /// - `args`: The evaluated arguments; the arity has been checked.
    /// - `settings`: Session precision and rounding.
    ///
    /// # Example
    /// ```
    /// use mpcalc::{
    ///     interpreter::{
    ///         evaluator::function::integer::fibonacci,
    ///         value::core::{Num, Settings},
    ///     },
    ///     table::funcs::Primitive,
    /// };
    ///
    /// let fib = Primitive::IntWord(fibonacci);
    /// let settings = Settings::default();
    ///
    /// assert_eq!(fib.apply("fib", &[&Num::from(10)], &settings).unwrap(), Num::from(55));
    /// assert!(fib.apply("fib", &[&Num::from(-1)], &settings).is_err());
    /// ```
    pub fn apply(self, name: &str, args: &[&Num], settings: &Settings) -> EvalResult<Num> {
        let precision = settings.precision;
        match (self, args) {
            (Self::FloatUnary(f), [x]) => f(&x.to_float(settings), precision).map(Num::Float),
            (Self::FloatBinary(f), [x, y]) => {
                f(&x.to_float(settings), &y.to_float(settings), precision).map(Num::Float)
            },
            (Self::FloatWord(f), [x, n]) => {
                let n = n.to_word(settings, &format!("Second argument to {name}"))?;
                f(&x.to_float(settings), n, precision).map(Num::Float)
            },
            (Self::IntUnary(f), [a]) => f(&a.to_integer(settings.rounding)).map(Num::Integer),
            (Self::IntWord(f), [n]) => {
                let n = n.to_word(settings, &format!("Argument to {name}"))?;
                f(n).map(Num::Integer)
            },
            (Self::IntBinary(f), [a, b]) => {
                f(&a.to_integer(settings.rounding), &b.to_integer(settings.rounding)).map(Num::Integer)
            },
            (Self::IntBinaryWord(f), [a, k]) => {
                let k = k.to_word(settings, &format!("Second argument to {name}"))?;
                f(&a.to_integer(settings.rounding), k).map(Num::Integer)
            },
            (Self::Aggregate(f), args) => f(args, settings),
            (_, args) => {
                Err(RuntimeError::InvalidArgument { details: format!("'{name}' cannot take {} arguments",
                                                                     args.len()) })
            },
        }
    }
}

/// Cube root; defined for negative arguments.
pub fn cbrt(x: &Float, precision: u32) -> EvalResult<Float> {
    x.root(3, precision)
}

/// `n`-th root of `x`.
pub fn root(x: &Float, n: u64, precision: u32) -> EvalResult<Float> {
    let n = u32::try_from(n).map_err(|_| RuntimeError::not_representable("Second argument to root"))?;
    x.root(n, precision)
}

/// Absolute value.
pub fn abs(x: &Float, precision: u32) -> EvalResult<Float> {
    Ok(x.abs().with_precision(precision))
}

/// Rounds to the nearest integer, halfway cases away from zero.
pub fn round(x: &Float, precision: u32) -> EvalResult<Float> {
    Ok(rounded(x, Rounding::HalfAway, precision))
}

/// Rounds toward positive infinity.
pub fn ceil(x: &Float, precision: u32) -> EvalResult<Float> {
    Ok(rounded(x, Rounding::Ceil, precision))
}

/// Rounds toward negative infinity.
pub fn floor(x: &Float, precision: u32) -> EvalResult<Float> {
    Ok(rounded(x, Rounding::Floor, precision))
}

/// Rounds toward zero.
pub fn trunc(x: &Float, precision: u32) -> EvalResult<Float> {
    Ok(rounded(x, Rounding::TowardZero, precision))
}

fn rounded(x: &Float, rounding: Rounding, precision: u32) -> Float {
    Float::from_bigint(&x.to_bigint(rounding), precision.max(x.precision()))
}
