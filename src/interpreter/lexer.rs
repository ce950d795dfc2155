use logos::{Lexer, Logos};

use crate::{
    error::{ParseError, RuntimeError},
    interpreter::value::{core::Num, literal::LiteralKind},
};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum Token {
    /// Numeric literal tokens, converted while lexing: `42`, `0x1f`, `0b101`,
    /// `017`, `0d017`, `3.14`, `.5`, `2e10`, `1.5k`.
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| literal(lex, LiteralKind::Integer))]
    #[regex(r"0[bB][01]+", |lex| literal(lex, LiteralKind::Integer))]
    #[regex(r"(0d)?[0-9]+", |lex| literal(lex, LiteralKind::Integer))]
    #[regex(r"(0d)?[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[a-zA-Z]?", |lex| literal(lex, LiteralKind::Float))]
    #[regex(r"(0d)?\.[0-9]+([eE][+-]?[0-9]+)?[a-zA-Z]?", |lex| literal(lex, LiteralKind::Float))]
    #[regex(r"(0d)?[0-9]+[eE][+-]?[0-9]+[a-zA-Z]?", |lex| literal(lex, LiteralKind::Float))]
    #[regex(r"(0d)?[0-9]+[kMGTPEmunpfa]", |lex| literal(lex, LiteralKind::Float))]
    Number(Num),
    /// Identifier tokens; variable, function or command names such as `x`,
    /// `square` or `ls`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `# Comments.`
    #[regex(r"#[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `**`
    #[token("**")]
    StarStar,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `!`
    #[token("!")]
    Bang,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Equals,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `-:`
    #[token("-:")]
    MinusColon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,

    /// Line breaks; they end statements.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Token::NewLine
    })]
    NewLine,
    /// Spaces, tabs, feeds and carriage returns.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and the precision at
/// which float literals are converted.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:      usize,
    /// Precision of float literals, in bits.
    pub precision: u32,
}

/// Errors raised by the lexer itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexError {
    /// The input contains a character no token starts with.
    #[default]
    UnexpectedCharacter,
    /// A numeric literal has digits that are invalid for its base.
    InvalidLiteral,
    /// A numeric literal ends in a suffix that is not an SI multiplier.
    UnknownSuffix(char),
}

impl From<RuntimeError> for LexError {
    fn from(error: RuntimeError) -> Self {
        match error {
            RuntimeError::UnknownSuffix { suffix, .. } => Self::UnknownSuffix(suffix),
            _ => Self::InvalidLiteral,
        }
    }
}

/// Converts the current numeric token.
fn literal(lex: &Lexer<Token>, kind: LiteralKind) -> Result<Num, LexError> {
    Ok(Num::from_literal(lex.slice(), kind, lex.extras.precision)?)
}

/// Splits `source` into tokens paired with their line numbers.
///
/// Float literals are converted at `precision` bits. Line breaks inside
/// parentheses or brackets are dropped; inside braces they are kept and
/// separate the expressions of the block.
///
/// # Errors
/// - `UnexpectedToken` for characters that start no token.
/// - `Literal` for malformed numeric literals; an unknown SI suffix is fatal.
///
/// # Example
/// ```
/// use mpcalc::interpreter::{
///     lexer::{Token, tokenize},
///     value::core::Num,
/// };
///
/// let tokens = tokenize("x = 0x10 # sixteen", 256).unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|(token, _)| token).collect();
///
/// assert_eq!(kinds,
///            vec![Token::Identifier("x".to_string()),
///                 Token::Equals,
///                 Token::Number(Num::from(16))]);
/// ```
pub fn tokenize(source: &str, precision: u32) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1, precision });

    let mut open = Vec::new();

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        match token {
            Ok(Token::NewLine) if matches!(open.last(), Some(Token::LParen | Token::LBracket)) => {},
            Ok(token) => {
                match token {
                    Token::LParen | Token::LBracket | Token::LBrace => open.push(token.clone()),
                    Token::RParen | Token::RBracket | Token::RBrace => {
                        open.pop();
                    },
                    _ => {},
                }
                tokens.push((token, line));
            },
            Err(LexError::UnexpectedCharacter) => {
                return Err(ParseError::UnexpectedToken { token: lexer.slice().to_string(),
                                                         line });
            },
            Err(LexError::InvalidLiteral) => {
                let source = RuntimeError::InvalidLiteral { literal: lexer.slice().to_string() };
                return Err(ParseError::Literal { source, line });
            },
            Err(LexError::UnknownSuffix(suffix)) => {
                let source = RuntimeError::UnknownSuffix { literal: lexer.slice().to_string(),
                                                           suffix };
                return Err(ParseError::Literal { source, line });
            },
        }
    }

    Ok(tokens)
}
