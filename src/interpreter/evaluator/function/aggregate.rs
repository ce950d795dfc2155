use std::cmp::Ordering;

use num_bigint::BigInt;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{comparison::order, core::apply_binary},
            core::EvalResult,
        },
        value::core::{Num, Settings},
    },
    util::num::usize_to_u64,
};

/// The smallest argument, returned unchanged.
pub fn min(args: &[&Num], settings: &Settings) -> EvalResult<Num> {
    extreme(args, settings, Ordering::Less)
}

/// The largest argument, returned unchanged.
pub fn max(args: &[&Num], settings: &Settings) -> EvalResult<Num> {
    extreme(args, settings, Ordering::Greater)
}

/// The arithmetic mean. Stays an integer when the sum divides evenly.
///
/// # Example
/// ```
/// use mpcalc::interpreter::{
///     evaluator::function::aggregate::avg,
///     value::core::{Num, Settings},
/// };
///
/// let settings = Settings::default();
/// let mean = avg(&[&Num::from(2), &Num::from(4), &Num::from(6)], &settings).unwrap();
///
/// assert_eq!(mean, Num::from(4));
/// ```
pub fn avg(args: &[&Num], settings: &Settings) -> EvalResult<Num> {
    let mut sum = Num::from(0);
    for value in args {
        sum = apply_binary(BinaryOperator::Add, &sum, value, settings)?;
    }
    let count = Num::from(BigInt::from(usize_to_u64(args.len())));
    apply_binary(BinaryOperator::Div, &sum, &count, settings)
}

fn extreme(args: &[&Num], settings: &Settings, wanted: Ordering) -> EvalResult<Num> {
    let (first, rest) = args.split_first()
                            .ok_or_else(|| RuntimeError::InvalidArgument { details: "no arguments".to_string() })?;
    let mut best = *first;
    for candidate in rest {
        if order(candidate, best, settings) == wanted {
            best = *candidate;
        }
    }
    Ok(best.clone())
}
