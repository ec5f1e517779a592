//! Tokenizer for line formulas.
//!
//! Produces char-indexed tokens; whitespace separates tokens and is otherwise dropped.

use crate::error::EvalError;

/// Lines with more tokens than this are rejected before parsing.
pub const MAX_TOKENS: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl TokenKind {
    /// Source-like rendering, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(value) => value.to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::StarStar => "**".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
        }
    }
}

/// A token with its char range in the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Split a line into tokens.
pub fn tokenize(text: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let c = chars[i];

        let kind = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                i = scan_number(&chars, i);
                let literal: String = chars[start..i].iter().collect();
                let malformed = || EvalError::MalformedNumber {
                    text: literal.clone(),
                    column: start,
                };
                // No legacy octal or zero-padded literals: `010` is an error, not 10.
                if c == '0' && chars.get(start + 1).is_some_and(char::is_ascii_digit) {
                    return Err(malformed());
                }
                TokenKind::Number(literal.parse::<f64>().map_err(|_| malformed())?)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                TokenKind::Ident(chars[start..i].iter().collect())
            }
            // `--` and `++` are increment/decrement, never two signs; `1 - -1` needs the space.
            '+' | '-' if chars.get(i + 1) == Some(&c) => {
                return Err(EvalError::UnexpectedToken {
                    found: format!("{c}{c}"),
                    column: start,
                });
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                TokenKind::StarStar
            }
            '+' | '-' | '*' | '/' | '%' | '(' | ')' => {
                i += 1;
                match c {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '%' => TokenKind::Percent,
                    '(' => TokenKind::LParen,
                    _ => TokenKind::RParen,
                }
            }
            ch => return Err(EvalError::UnexpectedChar { ch, column: start }),
        };

        tokens.push(Token {
            kind,
            start,
            end: i,
        });
        if tokens.len() > MAX_TOKENS {
            return Err(EvalError::TooLong { limit: MAX_TOKENS });
        }
    }

    Ok(tokens)
}

/// Scan `digits [. digits] [e [+-] digits]` (or `. digits ...`) starting at `i`.
///
/// Returns the end index. The scan is greedy over anything that could belong to the literal, so
/// `1e` or `1.2.3` come out as one malformed literal rather than several tokens.
fn scan_number(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        i += 1;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_alphanumeric() {
            i += 1;
        }
    }
    // A literal running straight into a word (`2x`) is malformed as a whole.
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    i
}
