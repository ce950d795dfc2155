use std::iter::Peekable;

use crate::{
    ast::{Command, FunctionDef, Statement},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_assignment, parse_expression},
            utils::{
                current_line, expect, looks_like_definition, parse_comma_separated,
                parse_identifier,
            },
        },
        value::format::OutputMode,
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a session command (`ls`, `lsfn`, `mode x`, `help`, `quit`).
/// - a function definition (`f(a, b) = body`).
/// - an expression used as a statement.
///
/// Parsing is attempted in that order; the first matching construct is
/// returned. The statement must be followed by a line break, a `;` or the
/// end of the input. A `;` only ends an expression statement when a
/// function definition follows it, and a definition body ends at the first
/// top-level `;`, so `x = 1; f(x) = x * 2; f(5)` is three statements.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, line)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
///
/// # Example
/// ```
/// use mpcalc::{
///     ast::{Command, Statement},
///     interpreter::{lexer::tokenize, parser::statement::parse_statement},
/// };
///
/// let tokens = tokenize("lsfn", 256).unwrap();
/// let statement = parse_statement(&mut tokens.iter().peekable()).unwrap();
///
/// assert_eq!(statement,
///            Statement::Command { command: Command::ListFunctions,
///                                 line:    1, });
/// ```
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let statement = if let Some(statement) = parse_command(tokens)? {
        statement
    } else if let Some(statement) = parse_function_definition(tokens)? {
        statement
    } else {
        let line = current_line(tokens, 0);
        let expr = parse_expression(tokens)?;
        Statement::Expression { expr, line }
    };

    match tokens.next() {
        None | Some((Token::NewLine | Token::Semicolon, _)) => Ok(statement),
        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
    }
}

/// Parses a session command.
///
/// A command word only counts as a command when it stands alone on its
/// line, so `ls = 3` still assigns a variable called `ls`. `mode` (or `m`)
/// takes the name of an output mode.
///
/// # Returns
/// - `Ok(Some(statement))` if a command was parsed,
/// - `Ok(None)` if the tokens do not form a command; nothing is consumed.
///
/// # Errors
/// `UnknownMode` if `mode` names no output mode.
fn parse_command<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    let Some((Token::Identifier(word), line)) = lookahead.next() else {
        return Ok(None);
    };
    let line = *line;
    let ends_line = |it: &mut Peekable<I>| matches!(it.peek(), None | Some((Token::NewLine, _)));

    let command = match word.as_str() {
        "ls" if ends_line(&mut lookahead) => Command::ListVariables,
        "lsfn" if ends_line(&mut lookahead) => Command::ListFunctions,
        "help" if ends_line(&mut lookahead) => Command::Help,
        "quit" | "exit" if ends_line(&mut lookahead) => Command::Quit,
        "mode" | "m" => {
            let Some((Token::Identifier(name), _)) = lookahead.next() else {
                return Ok(None);
            };
            if !ends_line(&mut lookahead) {
                return Ok(None);
            }
            let mode = OutputMode::from_name(name).ok_or_else(|| ParseError::UnknownMode { mode: name.clone(),
                                                                                        line })?;
            tokens.next();
            Command::SetMode(mode)
        },
        _ => return Ok(None),
    };
    tokens.next();

    Ok(Some(Statement::Command { command, line }))
}

/// Parses a function definition statement.
///
/// A function definition has the form:
/// ```text
///     name(param1, param2, ...) = expression
/// ```
///
/// The parser detects a definition by scanning ahead to the parenthesis
/// that closes the parameter list and checking that `=` follows it. The body
/// is a single assignment-level expression; use braces for a body made of
/// several expressions.
/// Otherwise this function returns `Ok(None)` without consuming input, and
/// the tokens are parsed as an expression (typically a call).
///
/// # Errors
/// Returns a `ParseError` if the parameter list contains anything but
/// identifiers or if the body is malformed.
fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if !looks_like_definition(tokens.clone()) {
        return Ok(None);
    }

    let line = current_line(tokens, 0);
    let name = parse_identifier(tokens, line)?;
    expect(tokens, &Token::LParen, line)?;
    let params = parse_comma_separated(tokens,
                                       |tokens| parse_identifier(tokens, line),
                                       &Token::RParen,
                                       line)?;
    expect(tokens, &Token::Equals, line)?;
    let body = parse_assignment(tokens)?;

    Ok(Some(Statement::Function(FunctionDef { name,
                                              params,
                                              body,
                                              line })))
}
