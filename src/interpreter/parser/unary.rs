use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, PartSelectKind, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_block, parse_expression, parse_if, parse_while},
            utils::{current_line, expect, parse_comma_separated},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `~`  (bitwise complement)
///
/// Prefix operators bind looser than `**`, so `-2 ** 2` is `-(2 ** 2)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "~") unary
///            | power
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => UnaryOperator::Negate,
        Some((Token::Tilde, _)) => UnaryOperator::Invert,
        _ => return parse_power(tokens),
    };
    tokens.next();
    let operand = parse_unary(tokens)?;
    Ok(Expr::unary(op, operand))
}

/// Parses exponentiation.
///
/// `**` is right-associative and its exponent may carry a sign:
/// `2 ** 3 ** 2` is `2 ** 9` and `2 ** -1` is `0.5`.
///
/// Grammar: `power := postfix ("**" unary)?`
pub(crate) fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_primary(tokens)?;
    let base = parse_postfix(tokens, base)?;
    if let Some((Token::StarStar, _)) = tokens.peek() {
        tokens.next();
        let exponent = parse_unary(tokens)?;
        return Ok(Expr::binary(BinaryOperator::Pow, base, exponent));
    }
    Ok(base)
}

/// Parses a chain of postfix operators applied to `expr`.
///
/// Supports:
/// - factorial: `x!`
/// - single bit: `x[i]`
/// - fixed range: `x[hi:lo]`
/// - descending range: `x[hi-:width]`
///
/// Postfix operators can be chained, e.g. `x[7:0][3]` or `n!!`.
pub(crate) fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut expr: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::Bang, _)) => {
                tokens.next();
                expr = Expr::unary(UnaryOperator::Factorial, expr);
            },
            Some((Token::LBracket, line)) => {
                let line = *line;
                tokens.next();
                expr = parse_part_select(tokens, expr, line)?;
            },
            _ => break,
        }
    }
    Ok(expr)
}

/// Parses the inside of `[...]` after `value`.
fn parse_part_select<'a, I>(tokens: &mut Peekable<I>, value: Expr, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let high = parse_expression(tokens)?;
    let (kind, low) = match tokens.peek() {
        Some((Token::Colon, _)) => {
            tokens.next();
            (PartSelectKind::Fixed, Some(parse_expression(tokens)?))
        },
        Some((Token::MinusColon, _)) => {
            tokens.next();
            (PartSelectKind::Descending, Some(parse_expression(tokens)?))
        },
        _ => (PartSelectKind::Single, None),
    };
    let close_line = current_line(tokens, line);
    expect(tokens, &Token::RBracket, close_line)?;

    Ok(Expr::part_select(kind, value, high, low))
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric literals
/// - variables
/// - function calls
/// - parenthesized expressions
/// - brace blocks
/// - `if` expressions
/// - `while` loops
///
/// Grammar (simplified):
/// ```text
///     primary := NUMBER
///              | IDENT
///              | IDENT "(" arguments ")"
///              | "(" expression ")"
///              | "{" block "}"
///              | if_expression
///              | while_expression
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (token, line) = tokens.next()
                              .ok_or(ParseError::UnexpectedEndOfInput { line: 0 })?;
    let line = *line;

    match token {
        Token::Number(value) => Ok(Expr::number(value.clone())),
        Token::Identifier(name) => parse_identifier_or_call(tokens, name, line),
        Token::LParen => {
            let inner = parse_expression(tokens)?;
            let close_line = current_line(tokens, line);
            expect(tokens, &Token::RParen, close_line)?;
            Ok(inner)
        },
        Token::LBrace => parse_block(tokens, line),
        Token::If => parse_if(tokens, line),
        Token::While => parse_while(tokens, line),
        tok => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line }),
    }
}

/// Parses what follows an identifier: a call when `(` comes next, a
/// variable reference otherwise.
fn parse_identifier_or_call<'a, I>(tokens: &mut Peekable<I>, name: &str, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, line)?;
        return Ok(Expr::call(name, arguments));
    }
    Ok(Expr::variable(name))
}

