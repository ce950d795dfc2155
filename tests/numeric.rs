use std::time::{Duration, Instant};

use mpcalc::{
    error::Error,
    get_result,
    interpreter::{
        evaluator::core::Context,
        value::{
            core::{DEFAULT_PRECISION, INTEGER_PRECISION, Num},
            format::{OutputMode, format_number},
        },
    },
};
use num_bigint::BigInt;

fn value(src: &str) -> Num {
    match get_result(src, false) {
        Ok(Some(value)) => value,
        Ok(None) => panic!("Script {src:?} produced no value"),
        Err(e) => panic!("Script {src:?} failed: {e}"),
    }
}

fn shown(src: &str) -> String {
    let mut ctx = Context::silent();
    match ctx.run_source(src) {
        Ok(Some(value)) => ctx.format(&value),
        Ok(None) => panic!("Script {src:?} produced no value"),
        Err(e) => panic!("Script {src:?} failed: {e}"),
    }
}

fn assert_failure(src: &str) {
    if get_result(src, false).is_ok() {
        panic!("Script {src:?} succeeded but was expected to fail")
    }
}

fn integer(digits: &str) -> Num {
    match BigInt::parse_bytes(digits.as_bytes(), 10) {
        Some(n) => Num::Integer(n),
        None => panic!("bad test literal {digits}"),
    }
}

#[test]
fn integer_literals() {
    assert_eq!(value("0x1f"), Num::from(31));
    assert_eq!(value("0b101"), Num::from(5));
    assert_eq!(value("017"), Num::from(15));
    assert_eq!(value("0d017"), Num::from(17));
    assert_eq!(value("0"), Num::from(0));
}

#[test]
fn float_literals() {
    assert_eq!(shown("1.5"), "1.5");
    assert_eq!(shown(".25"), "0.25");
    assert_eq!(shown("2e3"), "2000");
    assert_eq!(shown("1.5k"), "1500");
    assert_eq!(shown("2m"), "0.002");
    assert!(matches!(value("1.0"), Num::Float(_)));
}

#[test]
fn large_decimal_exponents_parse_quickly() {
    let start = Instant::now();
    assert_eq!(value("1e99999999 > 0"), Num::from(1));
    assert_eq!(value("1e-99999999 > 0"), Num::from(1));
    assert_eq!(value("1e-99999999 < 1e-99999998"), Num::from(1));
    assert!(start.elapsed() < Duration::from_secs(10),
            "took {:?}",
            start.elapsed());

    assert_failure("1e2000000000000");
}

#[test]
fn unknown_suffix_is_fatal() {
    match get_result("1.5q", false) {
        Err(e) => assert!(e.is_fatal(), "{e}"),
        Ok(_) => panic!("unknown suffix accepted"),
    }
    match get_result("1 / 0", false) {
        Err(e @ Error::Runtime { .. }) => assert!(!e.is_fatal()),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn division_stays_exact_when_possible() {
    assert_eq!(value("10 / 5"), Num::from(2));
    assert_eq!(value("-12 / 4"), Num::from(-3));
    assert!(matches!(value("10 / 4"), Num::Float(_)));
    assert_eq!(shown("10 / 4"), "2.5");
    assert_eq!(shown("1 / 3"), "0.33333333333333333333");
    assert_failure("1 / 0");
    assert_failure("1.5 / 0");
}

#[test]
fn whole_valued_floats_use_the_integer_domain() {
    assert!(matches!(value("4.0 / 2.0"), Num::Integer(_)));
    assert_eq!(value("4.0 / 2.0"), Num::from(2));
    assert!(matches!(value("2.0 * 3.0"), Num::Integer(_)));
    assert_eq!(value("2.0 * 3.0"), Num::from(6));
    assert!(matches!(value("5.0 / 2.0"), Num::Float(_)));
}

#[test]
fn modulo_follows_the_divisor_magnitude() {
    assert_eq!(value("7 % 3"), Num::from(1));
    assert_eq!(value("-7 % 3"), Num::from(2));
    assert_eq!(value("7 % -3"), Num::from(1));
    assert_failure("7 % 0");
}

#[test]
fn float_modulo_takes_the_sign_of_the_dividend() {
    assert_eq!(shown("-7.5 % 2"), "-1.5");
    assert_eq!(shown("7.5 % -2"), "1.5");
    assert_eq!(shown("7.5 % 2"), "1.5");
    assert_failure("7.5 % 0");
}

#[test]
fn integers_are_unbounded() {
    assert_eq!(value("25!"), integer("15511210043330985984000000"));
    assert_eq!(value("1 << 100"), integer("1267650600228229401496703205376"));
    assert_eq!(value("(1 << 64) * (1 << 64) == 1 << 128"), Num::from(1));
}

#[test]
fn mixed_operands_promote_to_float() {
    assert!(matches!(value("1 + 0.5"), Num::Float(_)));
    assert_eq!(shown("1 + 0.5"), "1.5");
    assert_eq!(shown("3 * 0.5"), "1.5");
    assert!(matches!(value("2 - 1"), Num::Integer(_)));
}

#[test]
fn results_carry_the_larger_operand_precision() {
    assert_eq!(value("1 + 0.5").precision(), INTEGER_PRECISION);
    assert_eq!(value("10 / 4").precision(), INTEGER_PRECISION);
    assert_eq!(value("1.5 * 0.25").precision(), DEFAULT_PRECISION);
    assert_eq!(value("0.5").precision(), DEFAULT_PRECISION);
}

#[test]
fn power_is_float() {
    assert_eq!(shown("2 ** 10"), "1024");
    assert_eq!(shown("4 ** 0.5"), "2");
    assert_eq!(shown("2 ** -1"), "0.5");
    assert_eq!(shown("2 ** 3 ** 2"), "512");
    assert_eq!(shown("-2 ** 2"), "-4");
}

#[test]
fn factorial() {
    assert_eq!(value("5!"), Num::from(120));
    assert_eq!(value("0!"), Num::from(1));
    assert_eq!(value("3!!"), Num::from(720));
    assert_failure("(-1)!");
    assert_failure("(1 << 70)!");
}

#[test]
fn bitwise_operators() {
    assert_eq!(value("6 & 3"), Num::from(2));
    assert_eq!(value("6 | 3"), Num::from(7));
    assert_eq!(value("6 ^ 3"), Num::from(5));
    assert_eq!(value("~5"), Num::from(-6));
    assert_eq!(value("-9 >> 1"), Num::from(-5));
    assert_eq!(value("5 << 2"), Num::from(20));
    assert_failure("1 << -1");
    assert_failure("1 << (1 << 70)");
}

#[test]
fn bitwise_operands_follow_the_output_mode_rounding() {
    assert_eq!(value("2.7 & 3"), Num::from(3));
    assert_eq!(value("mode x\n2.7 & 3"), Num::from(2));
}

#[test]
fn comparisons() {
    assert_eq!(value("1 == 1.0"), Num::from(1));
    assert_eq!(value("2 < 2.5"), Num::from(1));
    assert_eq!(value("3 != 3"), Num::from(0));
    assert_eq!(value("-1 >= -1"), Num::from(1));
    assert_eq!(value("(1 << 80) > (1 << 79)"), Num::from(1));
}

#[test]
fn part_selects() {
    assert_eq!(value("0xff[3:0]"), Num::from(15));
    assert_eq!(value("0b1010[1]"), Num::from(1));
    assert_eq!(value("0b1010[0]"), Num::from(0));
    assert_eq!(value("0xf0[7-:4]"), Num::from(15));
    assert_eq!(value("(-1)[3:0]"), Num::from(15));
    assert_eq!(value("0x1234[15:8][3:0]"), Num::from(2));
    assert_eq!(value("x = 0xabcd\nx[11:4]"), Num::from(0xbc));
}

#[test]
fn invalid_part_selects_fail() {
    assert_failure("5[-1]");
    assert_failure("5[0:1]");
    assert_failure("5[3-:0]");
    assert_failure("5[2-:4]");
    assert_failure("5[1 << 70]");
}

#[test]
fn formatting_in_every_mode() {
    let n = Num::from(255);
    assert_eq!(format_number(&n, OutputMode::Decimal, 20), "255");
    assert_eq!(format_number(&n, OutputMode::Hex, 20), "0xff");
    assert_eq!(format_number(&n, OutputMode::Binary, 20), "0b11111111");
    assert_eq!(format_number(&n, OutputMode::Octal, 20), "0377");
    assert_eq!(format_number(&Num::from(0), OutputMode::Octal, 20), "0");

    assert_eq!(shown("mode s\n1500.0"), "1.5e+03");
    assert_eq!(shown("mode x\n31.9"), "0x1f");
    assert_eq!(shown("1e30"), "1e+30");
    assert_eq!(shown("0.00001"), "1e-05");
    assert_eq!(shown("-0.5"), "-0.5");
}
