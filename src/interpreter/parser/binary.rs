use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Comparison, Expr},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses relational and equality operators.
///
/// Comparisons do not chain: `a < b < c` leaves the second `<` unconsumed,
/// which the statement parser then reports as an unexpected token.
///
/// The rule is: `comparison := bit_or (("<" | ">" | "<=" | ">=" | "==" |
/// "!=") bit_or)?`
///
/// # Returns
/// An `Expr::Compare` node, or the operand itself if no operator follows.
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let left = parse_bit_or(tokens)?;
    if let Some((token, _)) = tokens.peek()
       && let Some(op) = token_to_comparison(token)
    {
        tokens.next();
        let right = parse_bit_or(tokens)?;
        return Ok(Expr::compare(op, left, right));
    }
    Ok(left)
}

/// Parses bitwise OR: `bit_or := bit_xor ("|" bit_xor)*`
pub fn parse_bit_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, &[BinaryOperator::Or], parse_bit_xor)
}

/// Parses bitwise XOR: `bit_xor := bit_and ("^" bit_and)*`
pub fn parse_bit_xor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, &[BinaryOperator::Xor], parse_bit_and)
}

/// Parses bitwise AND: `bit_and := shift ("&" shift)*`
pub fn parse_bit_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, &[BinaryOperator::And], parse_shift)
}

/// Parses shifts: `shift := additive (("<<" | ">>") additive)*`
pub fn parse_shift<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     &[BinaryOperator::Shl, BinaryOperator::Shr],
                     parse_additive)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     &[BinaryOperator::Add, BinaryOperator::Sub],
                     parse_multiplicative)
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators `*`, `/` and `%`.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens,
                     &[BinaryOperator::Mul, BinaryOperator::Div, BinaryOperator::Mod],
                     parse_unary)
}

/// Folds `operand (op operand)*` to the left for the operators in `accepted`.
fn parse_left_assoc<'a, I>(tokens: &mut Peekable<I>,
                           accepted: &[BinaryOperator],
                           operand: fn(&mut Peekable<I>) -> ParseResult<Expr>)
                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some((token, _)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && accepted.contains(&op)
        {
            tokens.next();
            let right = operand(tokens)?;
            left = Expr::binary(op, left, right);
            continue;
        }
        break;
    }
    Ok(left)
}

/// Maps a token to its binary operator, if it is one.
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::StarStar => Some(BinaryOperator::Pow),
        Token::Ampersand => Some(BinaryOperator::And),
        Token::Pipe => Some(BinaryOperator::Or),
        Token::Caret => Some(BinaryOperator::Xor),
        Token::ShiftLeft => Some(BinaryOperator::Shl),
        Token::ShiftRight => Some(BinaryOperator::Shr),
        _ => None,
    }
}

/// Maps a token to its comparison operator, if it is one.
#[must_use]
pub const fn token_to_comparison(token: &Token) -> Option<Comparison> {
    match token {
        Token::Less => Some(Comparison::Lt),
        Token::Greater => Some(Comparison::Gt),
        Token::LessEqual => Some(Comparison::Le),
        Token::GreaterEqual => Some(Comparison::Ge),
        Token::EqualEqual => Some(Comparison::Eq),
        Token::BangEqual => Some(Comparison::Ne),
        _ => None,
    }
}
