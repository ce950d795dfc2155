use std::{
    fs,
    io::{self, BufRead, Write},
    process,
};

use clap::Parser;
use mpcalc::{
    config::Config,
    error::Error,
    interpreter::{
        evaluator::core::Context,
        lexer::{Token, tokenize},
        value::{
            core::DEFAULT_PRECISION,
            format::{DEFAULT_DIGITS, OutputMode},
        },
    },
};
use tracing::{Level, info};

/// mpcalc is an arbitrary-precision calculator with variables, user-defined
/// functions and bit-level operators.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells mpcalc to read a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode runs the script silently and prints only the value of its
    /// last expression.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Precision of floats, in bits.
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    /// Significant digits shown for floats.
    #[arg(long, default_value_t = DEFAULT_DIGITS)]
    digits: usize,

    /// Output mode: b, d, s, x or o.
    #[arg(short, long, default_value = "d", value_parser = parse_mode)]
    mode: OutputMode,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// A script, or a file name with `--file`. Starts an interactive session
    /// when absent.
    contents: Option<String>,
}

fn parse_mode(name: &str) -> Result<OutputMode, String> {
    OutputMode::from_name(name).ok_or_else(|| format!("unknown mode '{name}'"))
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level)
                             .with_writer(io::stderr)
                             .init();

    let config = Config { precision: args.precision,
                          digits:    args.digits,
                          mode:      args.mode, };

    let Some(contents) = args.contents else {
        repl(config);
        return;
    };

    let script = if args.file {
        fs::read_to_string(&contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{contents}'. Perhaps this file does not exist?");
            process::exit(1);
        })
    } else {
        contents
    };

    if let Err(e) = run_script(&script, config, args.pipe_mode) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run_script(script: &str, config: Config, pipe_mode: bool) -> Result<(), Error> {
    let out: Box<dyn Write> = if pipe_mode { Box::new(io::sink()) } else { Box::new(io::stdout()) };
    let mut context = Context::with_output(config, out);
    let result = context.run_source(script)?;

    if pipe_mode && let Some(value) = result {
        println!("{}", context.format(&value));
    }
    Ok(())
}

/// Reads statements from standard input until end of input or `quit`.
///
/// Lines are collected while braces or parentheses remain open, so blocks
/// and long argument lists can span several lines.
fn repl(config: Config) {
    let mut context = Context::with_output(config, Box::new(io::stdout()));
    let stdin = io::stdin();
    let mut pending = String::new();
    info!("interactive session started");

    prompt(&pending);
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        pending.push_str(&line);
        pending.push('\n');

        if open_delimiters(&pending, context.settings().precision) > 0 {
            prompt(&pending);
            continue;
        }

        if let Err(e) = context.run_source(&pending) {
            eprintln!("error: {e}");
            if e.is_fatal() {
                process::exit(1);
            }
        }
        pending.clear();

        if context.should_quit() {
            break;
        }
        prompt(&pending);
    }
}

fn prompt(pending: &str) {
    print!("{}", if pending.is_empty() { "> " } else { ". " });
    let _ = io::stdout().flush();
}

/// Number of unclosed braces, parentheses and brackets in `source`.
fn open_delimiters(source: &str, precision: u32) -> usize {
    let Ok(tokens) = tokenize(source, precision) else {
        return 0;
    };
    let mut depth = 0usize;
    for (token, _) in &tokens {
        match token {
            Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
            Token::RBrace | Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    depth
}
