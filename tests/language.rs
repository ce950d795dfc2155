use std::{
    cell::RefCell,
    fs::{self},
    io::{self, Write},
    rc::Rc,
};

use mpcalc::{
    config::Config,
    get_result,
    interpreter::{evaluator::core::Context, value::core::Num},
};
use walkdir::WalkDir;

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "calc"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        match get_result(&content, false) {
            Ok(Some(value)) => assert_eq!(value, Num::from(1), "{path:?} did not end in 1"),
            Ok(None) => panic!("{path:?} produced no value"),
            Err(e) => panic!("Script {path:?} failed:\n{content}\nError: {e:?}"),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

/// Collects everything a context writes.
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

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

fn run_captured(src: &str) -> String {
    let captured = Captured::default();
    let mut ctx = Context::with_output(Config::default(), Box::new(captured.clone()));
    if let Err(e) = ctx.run_source(src) {
        panic!("Script failed: {e}");
    }
    captured.text()
}

fn assert_success(src: &str) {
    if let Err(e) = get_result(src, false) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src, false).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_value(src: &str, expected: i64) {
    match get_result(src, false) {
        Ok(Some(value)) => assert_eq!(value, Num::from(expected), "for {src:?}"),
        Ok(None) => panic!("Script {src:?} produced no value"),
        Err(e) => panic!("Script {src:?} failed: {e}"),
    }
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_value("x = 1 + 2\nx == 3", 1);
    assert_value("x = 7 * 9\nx", 63);
    assert_value("x = 8 - 5\nx", 3);
    assert_value("x = 10 / 2\nx", 5);
    assert_value("a = b = 4\na + b", 8);
}

#[test]
fn operator_precedence() {
    assert_value("2 + 3 * 4", 14);
    assert_value("(2 + 3) * 4", 20);
    assert_value("1 << 4 | 1", 17);
    assert_value("6 & 3 ^ 1", 3);
    assert_value("1 + 1 == 2", 1);
    assert_value("10 - 4 - 3", 3);
    assert_value("-3 + 5", 2);
    assert_value("~0", -1);
}

#[test]
fn comparisons_do_not_chain() {
    assert_failure("1 < 2 < 3");
    assert_value("(1 < 2) < 3", 1);
}

#[test]
fn sequences_yield_their_last_value() {
    assert_value("a = 1; b = 2; a + b", 3);
    assert_value("x = 4;\nx", 4);
}

#[test]
fn blocks_span_lines() {
    assert_value("{\n  a = 2\n  b = 3\n  a * b\n}", 6);
    assert_value("{ }", 0);
    assert_value("{ 1; 2 } + 1", 3);
}

#[test]
fn parentheses_ignore_line_breaks() {
    assert_value("max(1,\n    7,\n    3)", 7);
    assert_value("(1 +\n 2)", 3);
}

#[test]
fn comments_are_ignored() {
    assert_value("x = 1 # one\n# a full comment line\nx + 1", 2);
}

#[test]
fn conditionals() {
    assert_value("x = 5\nif (x > 3) 1 else 2", 1);
    assert_value("if (0) 1", 0);
    assert_value("if (0) 1\nelse 2", 2);
    assert_value("if (0) 1 else if (0) 2 else 3", 3);
    assert_value("if (2.5) 7 else 8", 7);
}

#[test]
fn while_loops() {
    assert_value("i = 0; s = 0; while (i < 5) { i = i + 1; s = s + i }; s", 15);
    assert_value("while (0) 1", 0);
    assert_value("n = 3\nwhile (n > 0) n = n - 1", 0);
}

#[test]
fn user_functions() {
    assert_value("sq(a) = a * a\nsq(7)", 49);
    assert_value("add(a, b) = a + b\nadd(2, add(3, 4))", 9);
    assert_value("f(n) = if (n <= 1) 1 else n * f(n - 1)\nf(10)", 3_628_800);
    assert_value("zero() = 0\nzero() + 1", 1);
}

#[test]
fn definitions_can_follow_a_semicolon() {
    assert_value("x = 1; f(x) = x * 2; f(5)", 10);
    assert_value("x = 1; f(x) = x * 2; f(5); x", 1);
    assert_value("g(a) = a + 1; g(g(1))", 3);
    assert_value("h(a) = a;\nh(4)", 4);
}

#[test]
fn parameters_shadow_globals() {
    assert_value("x = 10\nf(x) = x * 2\nf(3) + x", 16);
}

#[test]
fn locals_do_not_leak() {
    assert_failure("g(a) = { t = a + 1; t * 2 }\ng(1)\nt");
    assert_value("g(a) = { t = a + 1; t * 2 }\ng(1)", 4);
}

#[test]
fn globals_are_resolved_at_call_time() {
    assert_value("k = 2\nh(a) = a * k\nk = 5\nh(2)", 10);
}

#[test]
fn functions_can_be_redefined() {
    assert_value("f(a) = a\nf(a) = a + 1\nf(1)", 2);
    assert_value("sin(x) = 42\nsin(0)", 42);
}

#[test]
fn arity_is_checked() {
    assert_failure("sin(1, 2)");
    assert_failure("sq(a) = a\nsq(1, 2)");
    assert_failure("sq(a) = a\nsq()");
    assert_failure("max(1)");
}

#[test]
fn unknown_names_fail() {
    assert_failure("nope + 1");
    assert_failure("nope(1)");
}

#[test]
fn syntax_errors_fail() {
    assert_failure("1 +");
    assert_failure("(1 + 2");
    assert_failure("1 2");
    assert_failure("x = ");
    assert_failure("{ 1; 2");
    assert_failure("f(1) = 2");
    assert_failure("3 $ 4");
}

#[test]
fn failed_statement_keeps_ans() {
    let mut ctx = Context::silent();
    assert!(ctx.run_source("6 * 7").is_ok());
    assert!(ctx.run_source("1 / 0").is_err());
    assert_eq!(ctx.lookup_variable("ans"), Some(Num::from(42)));
    assert_eq!(ctx.run_source("ans + 1").unwrap(), Some(Num::from(43)));
}

#[test]
fn results_are_printed_as_ans() {
    let output = run_captured("1 + 1\nx = 3");
    assert_eq!(output, "ans = 2\nans = 3\n");
}

#[test]
fn command_words_still_name_variables() {
    assert_value("ls = 3\nls + 1", 4);
    assert_value("m = 2\nm * 3", 6);
}

#[test]
fn ls_lists_variables() {
    let output = run_captured("b = 2\na = 1\nls");
    assert!(output.contains("a = 1\nans = 1\nb = 2\n"), "{output}");
}

#[test]
fn lsfn_lists_functions() {
    let output = run_captured("sq(a) = a * a\nlsfn");
    assert!(output.contains("sq [user-defined]"), "{output}");
    assert!(output.contains("sin [builtin]"), "{output}");
}

#[test]
fn mode_switches_output() {
    let output = run_captured("mode x\n255\nm b\n5\nmode o\n8\nmode d\n255");
    assert_eq!(output, "ans = 0xff\nans = 0b101\nans = 010\nans = 255\n");
}

#[test]
fn unknown_mode_fails() {
    assert_failure("mode q");
}

#[test]
fn quit_stops_the_script() {
    let mut ctx = Context::silent();
    assert!(ctx.run_source("x = 1\nquit\nx = 2").is_ok());
    assert!(ctx.should_quit());
    assert_eq!(ctx.lookup_variable("x"), Some(Num::from(1)));
}

#[test]
fn help_prints_usage() {
    let output = run_captured("help");
    assert!(output.contains("lsfn"));
}

#[test]
fn constants_are_defined() {
    assert_success("pi + e + G");
    assert_value("(pi > 3.14159) & (pi < 3.1416)", 1);
}
