//! Evaluation of parsed formulas.
//!
//! Arithmetic is plain IEEE-754 `f64`: division by zero gives an infinity and invalid operations
//! give `NaN`. Once a line parses, evaluating it cannot fail.

use crate::error::EvalError;
use crate::parser::{BinaryOp, Expr, UnaryOp, parse};

/// What a formula can see while evaluating: the results of the previous completed pass.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    previous: &'a [f64],
}

impl<'a> EvalContext<'a> {
    pub fn new(previous: &'a [f64]) -> Self {
        Self { previous }
    }

    /// `ans(index)`: `previous[index]` for a non-negative integral in-range index, else `NaN`.
    pub fn answer(&self, index: f64) -> f64 {
        if !(index.is_finite() && index >= 0.0 && index.fract() == 0.0) {
            return f64::NAN;
        }
        if index >= self.previous.len() as f64 {
            return f64::NAN;
        }
        self.previous[index as usize]
    }
}

impl Expr {
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> f64 {
        match self {
            Expr::Number(value) => *value,
            Expr::Unary { op, operand } => {
                let value = operand.evaluate(ctx);
                match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Minus => -value,
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(ctx);
                let rhs = rhs.evaluate(ctx);
                match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => lhs / rhs,
                    BinaryOp::Rem => lhs % rhs,
                    BinaryOp::Pow => pow(lhs, rhs),
                }
            }
            Expr::Answer(index) => ctx.answer(index.evaluate(ctx)),
        }
    }
}

/// `powf`, except that a `NaN` exponent, and ±1 raised to ±infinity, are `NaN`.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Parse and evaluate one line against the previous pass's results.
pub fn evaluate_line(text: &str, previous: &[f64]) -> Result<f64, EvalError> {
    let expr = parse(text)?;
    Ok(expr.evaluate(&EvalContext::new(previous)))
}
