use thiserror::Error;

/// Why a line failed to evaluate.
///
/// Callers working on whole documents never see these directly: [`evaluate_lines`] collapses
/// every failure to `NaN` for its line.
///
/// [`evaluate_lines`]: crate::evaluate_lines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    /// The line holds no tokens.
    Empty,

    #[error("unexpected character '{ch}' at column {column}")]
    /// A character that starts no token.
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Char column within the line.
        column: usize,
    },

    #[error("malformed number '{text}' at column {column}")]
    /// A numeric literal that does not form a number (e.g. `1e`).
    MalformedNumber {
        /// The literal as written.
        text: String,
        /// Char column within the line.
        column: usize,
    },

    #[error("unexpected '{found}' at column {column}")]
    /// A token the grammar does not allow here.
    UnexpectedToken {
        /// The token as written.
        found: String,
        /// Char column within the line.
        column: usize,
    },

    #[error("unexpected end of expression")]
    /// The line ended mid-expression.
    UnexpectedEnd,

    #[error("unknown identifier '{name}' at column {column}")]
    /// Any identifier other than `ans`.
    UnknownIdentifier {
        /// The identifier as written.
        name: String,
        /// Char column within the line.
        column: usize,
    },

    #[error("expression nested deeper than {limit} levels")]
    /// Parentheses, `ans(...)` calls or unary signs nested past the limit.
    TooDeep {
        /// The nesting limit.
        limit: usize,
    },

    #[error("expression longer than {limit} tokens")]
    /// The line has more tokens than the evaluator accepts.
    TooLong {
        /// The token limit.
        limit: usize,
    },
}
