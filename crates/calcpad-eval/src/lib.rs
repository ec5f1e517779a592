//! `calcpad-eval` - per-line arithmetic evaluation.
//!
//! Every line of a document is an independent formula over `f64`:
//!
//! - numeric literals (`2`, `0.5`, `.5`, `1e3`), parentheses
//! - `+ - * / %` and right-associative `**`, unary `+`/`-`
//! - `ans(n)`: the value of line `n` from the previous evaluation pass
//!
//! Nothing else is accepted. In particular, lines are never executed as code of any host
//! language; anything outside this grammar fails to parse.
//!
//! Failures never escape a line. [`evaluate_lines`] maps each failing line to `NaN` and keeps
//! going, and `ans(n)` with an index that is negative, fractional or past the previous pass is
//! `NaN` as well.
//!
//! ```rust
//! use calcpad_eval::{Calculator, Trigger, TriggerPolicy};
//!
//! let mut calculator = Calculator::new(TriggerPolicy::OnEnter);
//! calculator.calculate(&["1+1", "3*2"]);
//!
//! let lines = ["1+1", "3*2", "ans(0)+ans(1)"];
//! assert!(!calculator.notify(Trigger::TextChanged, &lines));
//! assert!(calculator.notify(Trigger::Enter, &lines));
//! assert_eq!(calculator.results().summary(), "ans[0]: 2 | ans[1]: 6 | ans[2]: 8");
//! ```

mod calculator;
mod error;
mod eval;
pub mod lexer;
pub mod parser;
mod results;

pub use calculator::{Calculator, ParsePolicyError, Trigger, TriggerPolicy};
pub use error::EvalError;
pub use eval::{EvalContext, evaluate_line};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{BinaryOp, Expr, UnaryOp, parse};
pub use results::{ResultSequence, evaluate_lines, format_value};
