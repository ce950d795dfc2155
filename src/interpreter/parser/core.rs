use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_comparison,
            utils::{at_terminator, current_line, expect, looks_like_definition, skip_newlines},
        },
        value::core::Num,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, the `;` sequence, and recursively descends
/// through the precedence hierarchy.
///
/// Grammar:
/// ```text
///     expression := assignment (";" assignment)* ";"?
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node. `a; b; c` nests to the left and yields the
/// value of `c` when evaluated. A `;` followed by a function definition is
/// left for the statement parser.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_assignment(tokens)?;
    while let Some((Token::Semicolon, _)) = tokens.peek() {
        let mut after = tokens.clone();
        after.next();
        if looks_like_definition(after) {
            break;
        }
        tokens.next();
        if at_terminator(tokens) {
            break;
        }
        let right = parse_assignment(tokens)?;
        left = Expr::sequence(left, right);
    }
    Ok(left)
}

/// Parses an assignment `name = value`.
///
/// Assignment is right-associative: `a = b = 3` assigns 3 to both. Anything
/// that does not start with an identifier followed by `=` falls through to
/// comparison.
///
/// Grammar:
/// ```text
///     assignment := IDENT "=" assignment
///                 | comparison
/// ```
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    if let Some((Token::Identifier(name), _)) = lookahead.next()
       && let Some((Token::Equals, _)) = lookahead.next()
    {
        tokens.next();
        tokens.next();
        let value = parse_assignment(tokens)?;
        return Ok(Expr::assign(name.clone(), value));
    }
    parse_comparison(tokens)
}

/// Parses an `if` expression with an optional `else` branch.
///
/// Syntax:
/// ```text
///     if (<condition>) <then_expr>
///     if (<condition>) <then_expr> else <else_expr>
/// ```
/// Line breaks are allowed after the condition and before `else`.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `line`: Line number of the `if` token.
///
/// # Errors
/// - `UnexpectedToken` if the parenthesized condition is missing.
/// - Propagates any errors from sub-expression parsing.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_condition(tokens, line)?;
    skip_newlines(tokens);
    let then_branch = parse_assignment(tokens)?;

    let mut lookahead = tokens.clone();
    skip_newlines(&mut lookahead);
    let else_branch = match lookahead.peek() {
        Some((Token::Else, _)) => {
            skip_newlines(tokens);
            tokens.next();
            skip_newlines(tokens);
            Some(parse_assignment(tokens)?)
        },
        _ => None,
    };

    Ok(Expr::if_else(condition, then_branch, else_branch))
}

/// Parses a `while` loop.
///
/// Syntax: `while (<condition>) <body>`, with an optional line break before
/// the body.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_condition(tokens, line)?;
    skip_newlines(tokens);
    let body = parse_assignment(tokens)?;

    Ok(Expr::while_loop(condition, body))
}

/// Parses a brace block `{ a; b \n c }`.
///
/// Inside a block, line breaks separate expressions just like `;`. The
/// block evaluates to its last expression; an empty block yields 0.
///
/// # Parameters
/// - `tokens`: Token stream positioned after `{`.
/// - `line`: Line number of the `{` token.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut block: Option<Expr> = None;
    loop {
        while let Some((Token::NewLine | Token::Semicolon, _)) = tokens.peek() {
            tokens.next();
        }
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
            Some(_) => {
                let item = parse_expression(tokens)?;
                block = Some(match block {
                                 Some(previous) => Expr::sequence(previous, item),
                                 None => item,
                             });
            },
        }
    }

    Ok(block.unwrap_or_else(|| Expr::number(Num::from(0))))
}

/// Parses `( <expression> )` after a control keyword.
fn parse_condition<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let open = expect(tokens, &Token::LParen, line)?;
    let condition = parse_expression(tokens)?;
    let close_line = current_line(tokens, open);
    expect(tokens, &Token::RParen, close_line)?;
    Ok(condition)
}
