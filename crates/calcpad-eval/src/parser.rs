//! Recursive-descent parser for line formulas.
//!
//! ```text
//! expr     := term (('+' | '-') term)*
//! term     := exponent (('*' | '/' | '%') exponent)*
//! exponent := sign unary            -- may not be followed by '**'
//!           | primary ('**' exponent)?
//! unary    := sign unary | primary
//! primary  := number | '(' expr ')' | 'ans' '(' expr ')'
//! ```
//!
//! `**` is right associative and an unparenthesized signed base (`-2 ** 2`) is rejected rather
//! than silently picking a precedence.

use crate::error::EvalError;
use crate::lexer::{Token, TokenKind, tokenize};

/// Nesting limit for parentheses, `ans(...)` and sign chains.
pub const MAX_DEPTH: usize = 256;

/// Name of the previous-answer accessor.
pub const ANSWER_FN: &str = "ans";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `ans(index)`: a result from the previous evaluation pass.
    Answer(Box<Expr>),
}

/// Parse a whole line. Trailing tokens are an error.
pub fn parse(text: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token)),
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'t TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), EvalError> {
        match self.advance() {
            Some(token) if &token.kind == kind => Ok(()),
            Some(token) => Err(unexpected(token)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_exponent()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_exponent()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_exponent(&mut self) -> Result<Expr, EvalError> {
        if sign_of(self.peek_kind()).is_some() {
            let expr = self.parse_unary()?;
            return match self.peek() {
                Some(token) if token.kind == TokenKind::StarStar => Err(unexpected(token)),
                _ => Ok(expr),
            };
        }

        let base = self.parse_primary()?;
        if self.peek_kind() != Some(&TokenKind::StarStar) {
            return Ok(base);
        }
        self.pos += 1;

        self.descend()?;
        let exponent = self.parse_exponent();
        self.ascend();
        Ok(binary(BinaryOp::Pow, base, exponent?))
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let Some(op) = sign_of(self.peek_kind()) else {
            return self.parse_primary();
        };
        self.pos += 1;

        self.descend()?;
        let operand = self.parse_unary();
        self.ascend();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.advance().ok_or(EvalError::UnexpectedEnd)?;
        match &token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(*value)),
            TokenKind::LParen => {
                let inner = self.parse_nested()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) if name == ANSWER_FN => {
                self.expect(&TokenKind::LParen)?;
                let index = self.parse_nested()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::Answer(Box::new(index)))
            }
            TokenKind::Ident(name) => Err(EvalError::UnknownIdentifier {
                name: name.clone(),
                column: token.start,
            }),
            _ => Err(unexpected(token)),
        }
    }

    fn parse_nested(&mut self) -> Result<Expr, EvalError> {
        self.descend()?;
        let inner = self.parse_expr();
        self.ascend();
        inner
    }
}

fn sign_of(kind: Option<&TokenKind>) -> Option<UnaryOp> {
    match kind {
        Some(TokenKind::Plus) => Some(UnaryOp::Plus),
        Some(TokenKind::Minus) => Some(UnaryOp::Minus),
        _ => None,
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn unexpected(token: &Token) -> EvalError {
    EvalError::UnexpectedToken {
        found: token.kind.describe(),
        column: token.start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Box<Expr> {
        Box::new(Expr::Number(value))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: num(1.0),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: num(2.0),
                    rhs: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(
            parse("2**3**2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Pow,
                lhs: num(2.0),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: num(3.0),
                    rhs: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_signed_base_needs_parentheses() {
        assert!(matches!(
            parse("-2**2"),
            Err(EvalError::UnexpectedToken { column: 2, .. })
        ));
        assert!(parse("(-2)**2").is_ok());
        assert!(parse("2**-2").is_ok());
    }

    #[test]
    fn test_answer_call() {
        assert_eq!(parse("ans(1)").unwrap(), Expr::Answer(num(1.0)));
        assert_eq!(parse("ans 1"), Err(EvalError::UnexpectedToken {
            found: "1".to_string(),
            column: 4,
        }));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(EvalError::Empty));
        assert_eq!(parse("   "), Err(EvalError::Empty));
        assert_eq!(parse("(1+2"), Err(EvalError::UnexpectedEnd));
        assert_eq!(parse("1+"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(parse("1 2"), Err(EvalError::UnexpectedToken { column: 2, .. })));
        assert!(matches!(parse(")"), Err(EvalError::UnexpectedToken { column: 0, .. })));
        assert_eq!(
            parse("bogus(((").unwrap_err(),
            EvalError::UnknownIdentifier {
                name: "bogus".to_string(),
                column: 0,
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&deep), Err(EvalError::TooDeep { limit: MAX_DEPTH }));

        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse(&ok), Ok(Expr::Number(1.0)));

        let signs = format!("{}1", "- ".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&signs), Err(EvalError::TooDeep { limit: MAX_DEPTH }));
    }
}
