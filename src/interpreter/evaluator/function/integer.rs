use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Small primes used for trial division and as Miller-Rabin witnesses.
const SMALL_PRIMES: [u32; 25] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59,
                                 61, 67, 71, 73, 79, 83, 89, 97];

/// Miller-Rabin test with the first 25 primes as witnesses.
///
/// Exact for every `n` below `3.3 * 10^24`; a probable-prime test above.
///
/// # Example
/// ```
/// use mpcalc::interpreter::evaluator::function::integer::is_probable_prime;
/// use num_bigint::BigInt;
///
/// assert!(is_probable_prime(&BigInt::from(1_000_000_007)));
/// assert!(!is_probable_prime(&BigInt::from(561)));
/// ```
#[must_use]
pub fn is_probable_prime(n: &BigInt) -> bool {
    if *n < BigInt::from(2) {
        return false;
    }
    for p in SMALL_PRIMES {
        if *n == BigInt::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    let n_minus_one: BigInt = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for p in SMALL_PRIMES {
        let mut x = BigInt::from(p).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// The smallest prime greater than `n`.
pub fn next_prime(n: &BigInt) -> EvalResult<BigInt> {
    let two = BigInt::from(2);
    if *n < two {
        return Ok(two);
    }
    let mut candidate: BigInt = n + 1u32;
    if candidate.is_even() {
        candidate += 1u32;
    }
    while !is_probable_prime(&candidate) {
        candidate += 2u32;
    }
    Ok(candidate)
}

/// Greatest common divisor, never negative.
pub fn gcd(a: &BigInt, b: &BigInt) -> EvalResult<BigInt> {
    Ok(a.gcd(b))
}

/// Least common multiple, never negative.
pub fn lcm(a: &BigInt, b: &BigInt) -> EvalResult<BigInt> {
    Ok(a.lcm(b))
}

/// Divides `a` by `factor` as long as the division is exact.
pub fn remove_factor(a: &BigInt, factor: &BigInt) -> EvalResult<BigInt> {
    if factor.abs() < BigInt::from(2) {
        return Err(RuntimeError::domain("remfac", "factor must be at least 2 in magnitude"));
    }
    let mut value = a.clone();
    while !value.is_zero() {
        let (quotient, remainder) = value.div_rem(factor);
        if !remainder.is_zero() {
            break;
        }
        value = quotient;
    }
    Ok(value)
}

/// Binomial coefficient `C(n, k)`, extended to negative `n` by
/// `C(n, k) = (-1)^k * C(k - n - 1, k)`.
///
/// # Example
/// ```
/// use mpcalc::interpreter::evaluator::function::integer::binomial;
/// use num_bigint::BigInt;
///
/// assert_eq!(binomial(&BigInt::from(5), 2).unwrap(), BigInt::from(10));
/// assert_eq!(binomial(&BigInt::from(3), 5).unwrap(), BigInt::from(0));
/// assert_eq!(binomial(&BigInt::from(-2), 3).unwrap(), BigInt::from(-4));
/// ```
pub fn binomial(n: &BigInt, k: u64) -> EvalResult<BigInt> {
    let mut result = BigInt::one();
    for i in 1..=k {
        result = result * (n - k + i) / i;
        if result.is_zero() {
            break;
        }
    }
    Ok(result)
}

/// The `n`-th Fibonacci number, by fast doubling.
///
/// # Example
/// ```
/// use mpcalc::interpreter::evaluator::function::integer::fibonacci;
/// use num_bigint::BigInt;
///
/// assert_eq!(fibonacci(0).unwrap(), BigInt::from(0));
/// assert_eq!(fibonacci(10).unwrap(), BigInt::from(55));
/// assert_eq!(fibonacci(90).unwrap(), BigInt::from(2_880_067_194_370_816_120_u64));
/// ```
pub fn fibonacci(n: u64) -> EvalResult<BigInt> {
    let mut a = BigInt::zero();
    let mut b = BigInt::one();
    for bit in (0..u64::BITS - n.leading_zeros()).rev() {
        let c = &a * (&b * 2u32 - &a);
        let d = &a * &a + &b * &b;
        if n >> bit & 1 == 1 {
            b = &c + &d;
            a = d;
        } else {
            a = c;
            b = d;
        }
    }
    Ok(a)
}

/// The inverse of `a` modulo `m`, in `[0, |m|)`.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> EvalResult<BigInt> {
    if m.is_zero() {
        return Err(RuntimeError::DivisionByZero);
    }
    let modulus = m.abs();
    let extended = a.mod_floor(&modulus).extended_gcd(&modulus);
    if !extended.gcd.is_one() {
        return Err(RuntimeError::domain("invert", "the arguments are not coprime"));
    }
    Ok(extended.x.mod_floor(&modulus))
}

/// Number of bit positions in which `a` and `b` differ.
pub fn hamming_distance(a: &BigInt, b: &BigInt) -> EvalResult<BigInt> {
    let difference = a ^ b;
    if difference.is_negative() {
        return Err(RuntimeError::domain("hamdist", "operands of opposite sign differ in infinitely many bits"));
    }
    Ok(BigInt::from(count_ones(&difference)))
}

/// Number of one bits in a non-negative integer.
pub fn popcount(a: &BigInt) -> EvalResult<BigInt> {
    if a.is_negative() {
        return Err(RuntimeError::domain("popcount", "negative numbers have infinitely many one bits"));
    }
    Ok(BigInt::from(count_ones(a)))
}

fn count_ones(a: &BigInt) -> u64 {
    a.magnitude()
     .to_u64_digits()
     .iter()
     .map(|digit| u64::from(digit.count_ones()))
     .sum()
}
