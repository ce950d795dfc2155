use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by function argument lists and parameter lists. It
/// repeatedly calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list.
/// - `line`: Line of the opening token, reported if the input ends early.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, an unexpected token is
/// encountered or the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    line: usize)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected ',' or {closing:?}, found {tok:?}"),
                                                         line:  *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the
/// input ends.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              line: usize)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected identifier, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Consumes the next token, which must equal `expected`.
///
/// # Returns
/// The line of the consumed token.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    line: usize)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, line)) if tok == expected => Ok(*line),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {expected:?}, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Skips any run of line breaks.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)>
{
    while let Some((Token::NewLine, _)) = tokens.peek() {
        tokens.next();
    }
}

/// Line of the next token, or `fallback` at the end of input.
pub(in crate::interpreter::parser) fn current_line<'a, I>(tokens: &mut Peekable<I>,
                                                          fallback: usize)
                                                          -> usize
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.peek().map_or(fallback, |(_, line)| *line)
}

/// Returns `true` if the next token ends the current statement or group.
pub(in crate::interpreter::parser) fn at_terminator<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    matches!(tokens.peek(),
             None | Some((Token::NewLine | Token::RParen | Token::RBrace | Token::Semicolon, _)))
}

/// Returns `true` for `IDENT "(" ... ")" "="` with balanced parentheses.
pub(in crate::interpreter::parser) fn looks_like_definition<'a, I>(mut lookahead: Peekable<I>)
                                                                     -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if !matches!(lookahead.next(), Some((Token::Identifier(_), _)))
       || !matches!(lookahead.next(), Some((Token::LParen, _)))
    {
        return false;
    }

    let mut depth = 1usize;
    while depth > 0 {
        match lookahead.next() {
            Some((Token::LParen, _)) => depth += 1,
            Some((Token::RParen, _)) => depth -= 1,
            Some((Token::NewLine, _)) | None => return false,
            Some(_) => {},
        }
    }

    matches!(lookahead.next(), Some((Token::Equals, _)))
}
