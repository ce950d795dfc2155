use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use mpcalc::{
    ast::{BinaryOperator, Expr},
    config::Config,
    get_result,
    interpreter::{evaluator::core::Context, value::core::Num},
    table::funcs::FunctionKind,
};

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

/// `1` when `|a - b|` is below `10^-40`.
fn close(a: &str, b: &str) -> String {
    format!("abs(({a}) - ({b})) < 1e-40")
}

#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn roots_and_rounding() {
    assert_eq!(shown("sqrt(16)"), "4");
    assert!(shown("sqrt(2)").starts_with("1.41421356237309504"));
    assert_eq!(shown("cbrt(-27)"), "-3");
    assert_eq!(shown("root(32, 5)"), "2");
    assert_eq!(shown("abs(-2.5)"), "2.5");
    assert_eq!(shown("round(2.5)"), "3");
    assert_eq!(shown("round(-2.5)"), "-3");
    assert_eq!(shown("floor(-2.5)"), "-3");
    assert_eq!(shown("ceil(2.1)"), "3");
    assert_eq!(shown("trunc(-2.7)"), "-2");
    assert_eq!(shown("int(9.99)"), "9");
    assert_failure("sqrt(-1)");
}

#[test]
fn transcendental_functions() {
    assert_eq!(shown("sin(0)"), "0");
    assert_eq!(shown("cos(0)"), "1");
    assert!(shown("pi").starts_with("3.14159265358979323"));
    assert!(shown("exp(1)").starts_with("2.71828182845904523"));
    assert_eq!(value(&close("ln(e)", "1")), Num::from(1));
    assert_eq!(value(&close("log2(1024)", "10")), Num::from(1));
    assert_eq!(value(&close("log10(1000)", "3")), Num::from(1));
    assert_eq!(value(&close("sin(pi / 6)", "0.5")), Num::from(1));
    assert_eq!(value(&close("4 * atan(1)", "pi")), Num::from(1));
    assert_eq!(value(&close("atan2(1, 1) * 4", "pi")), Num::from(1));
    assert_eq!(value(&close("asin(1) * 2", "pi")), Num::from(1));
    assert_eq!(value(&close("cosh(1) ** 2 - sinh(1) ** 2", "1")), Num::from(1));
    assert_eq!(value(&close("atanh(tanh(0.5))", "0.5")), Num::from(1));
    assert_eq!(value(&close("hypot(3, 4)", "5")), Num::from(1));
    assert_eq!(value(&close("erf(0) + erfc(0)", "1")), Num::from(1));
    assert_failure("ln(0)");
    assert_failure("asin(2)");
}

#[test]
fn integer_functions() {
    assert_eq!(value("gcd(12, 18)"), Num::from(6));
    assert_eq!(value("lcm(4, 6)"), Num::from(12));
    assert_eq!(value("bin(5, 2)"), Num::from(10));
    assert_eq!(value("fib(10)"), Num::from(55));
    assert_eq!(value("nextprime(13)"), Num::from(17));
    assert_eq!(value("nextprime(-5)"), Num::from(2));
    assert_eq!(value("invert(3, 7)"), Num::from(5));
    assert_eq!(value("inv(3, 7)"), Num::from(5));
    assert_eq!(value("remfac(48, 2)"), Num::from(3));
    assert_eq!(value("popcount(255)"), Num::from(8));
    assert_eq!(value("countones(0b1011)"), Num::from(3));
    assert_eq!(value("hamdist(5, 3)"), Num::from(2));
}

#[test]
fn integer_functions_reject_bad_arguments() {
    assert_failure("fib(-1)");
    assert_failure("fib(1 << 70)");
    assert_failure("bin(5, -1)");
    assert_failure("invert(2, 4)");
    assert_failure("invert(3, 0)");
    assert_failure("remfac(8, 1)");
    assert_failure("popcount(-1)");
    assert_failure("hamdist(-1, 1)");
}

#[test]
fn aggregates() {
    assert_eq!(value("min(3, 1, 2)"), Num::from(1));
    assert_eq!(value("max(3, 1, 2)"), Num::from(3));
    assert_eq!(value("avg(2, 4, 6)"), Num::from(4));
    assert_eq!(shown("avg(1, 2)"), "1.5");
    assert_eq!(shown("max(1, 2.5)"), "2.5");
}

#[test]
fn sums_and_products() {
    assert_eq!(value("sum(k, k, 1, 100)"), Num::from(5050));
    assert_eq!(value("sum(k, k, 1, 10, 2)"), Num::from(25));
    assert_eq!(value("sum(k, k, 5, 1, -1)"), Num::from(15));
    assert_eq!(value("sum(k, k, 5, 1)"), Num::from(0));
    assert_eq!(value("prod(k, k, 1, 5)"), Num::from(120));
    assert_eq!(shown("sum(k, k, 0, 1, 0.25)"), "2.5");
}

#[test]
fn loops_run_in_their_own_scope() {
    assert_failure("sum(k, k, 1, 3)\nk");
    assert_eq!(value("k = 7\nsum(k, k, 1, 3)\nk"), Num::from(7));
    assert_eq!(value("f(n) = sum(k * n, k, 1, 3)\nf(2)"), Num::from(12));
    assert_eq!(value("total = 0\nsum(total = k, k, 1, 3)\ntotal"), Num::from(0));
}

#[test]
fn loop_arguments_are_checked() {
    assert_failure("sum(k, k, 1, 3, 0)");
    assert_failure("sum(k, 2, 1, 3)");
    assert_failure("sum(k, k, 1)");
    assert_failure("sum(k, k, 1.0, 2.0, 1e-100)");
}

#[test]
fn tab_prints_every_row() {
    let captured = Captured::default();
    let mut ctx = Context::with_output(Config::default(), Box::new(captured.clone()));
    let result = ctx.run_source("tab(k * k, k, 1, 3)").unwrap();

    assert_eq!(result, Some(Num::from(9)));
    let output = String::from_utf8_lossy(&captured.0.borrow()).into_owned();
    assert_eq!(output, "k = 1\t1\nk = 2\t4\nk = 3\t9\nans = 9\n");
}

#[test]
fn define_function_through_the_api() {
    let mut ctx = Context::silent();
    let body = Expr::binary(BinaryOperator::Mul, Expr::variable("a"), Expr::variable("a"));
    ctx.define_function("square", vec!["a".to_string()], body);

    assert_eq!(ctx.run_source("square(12)").unwrap(), Some(Num::from(144)));
    assert!(ctx.list_functions()
               .contains(&("square".to_string(), FunctionKind::UserDefined)));
    assert!(ctx.list_functions()
               .contains(&("sqrt".to_string(), FunctionKind::Builtin)));
}

#[test]
fn list_and_lookup_variables() {
    let mut ctx = Context::silent();
    ctx.run_source("zeta = 3\nalpha = 1").unwrap();

    let names = ctx.list_variables();
    assert_eq!(names, vec!["G", "alpha", "ans", "e", "pi", "zeta"]);
    assert_eq!(ctx.lookup_variable("zeta"), Some(Num::from(3)));
    assert_eq!(ctx.lookup_variable("missing"), None);
}
