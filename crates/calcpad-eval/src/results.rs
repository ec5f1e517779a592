//! Result sequences: one value per line, `NaN` for lines that failed.

use crate::eval::evaluate_line;
use std::fmt;
use tracing::debug;

/// The outcome of one evaluation pass.
///
/// Two sequences compare equal when they have the same length and each position holds the same
/// value, with `NaN` equal to `NaN`.
#[derive(Debug, Clone, Default)]
pub struct ResultSequence {
    values: Vec<f64>,
}

impl ResultSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Number of lines whose value is `NaN`.
    pub fn failure_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// `ans[0]: 4 | ans[1]: NaN`
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl From<Vec<f64>> for ResultSequence {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl PartialEq for ResultSequence {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl fmt::Display for ResultSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "ans[{index}]: {}", format_value(*value))?;
        }
        Ok(())
    }
}

/// Render a number for display.
///
/// Integral values have no fraction (`4`), negative zero is `0`, non-finite values are `NaN`,
/// `Infinity` and `-Infinity`, and magnitudes outside `[1e-6, 1e21)` use exponent notation
/// with an explicit sign (`1e+21`, `1.5e-7`).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exp,
    }
}

/// Evaluate every line against `previous`, collapsing failures to `NaN`.
///
/// The result always has one entry per line; a failing line never affects the others.
pub fn evaluate_lines<S: AsRef<str>>(lines: &[S], previous: &ResultSequence) -> ResultSequence {
    let values: Vec<f64> = lines
        .iter()
        .enumerate()
        .map(
            |(line, text)| match evaluate_line(text.as_ref(), previous.values()) {
                Ok(value) => value,
                Err(err) => {
                    debug!(line, error = %err, "line evaluation failed");
                    f64::NAN
                }
            },
        )
        .collect();

    let results = ResultSequence::new(values);
    debug!(
        lines = results.len(),
        failed = results.failure_count(),
        "evaluation pass complete"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(-2.5), "-2.5");
        assert_eq!(format_value(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "Infinity");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_value(1e21), "1e+21");
        assert_eq!(format_value(1.5e-7), "1.5e-7");
        assert_eq!(format_value(123456789.0), "123456789");
    }

    #[test]
    fn test_summary() {
        let results = ResultSequence::new(vec![4.0, f64::NAN]);
        assert_eq!(results.summary(), "ans[0]: 4 | ans[1]: NaN");
        assert_eq!(ResultSequence::default().summary(), "");
    }

    #[test]
    fn test_nan_aware_equality() {
        assert_eq!(
            ResultSequence::new(vec![1.0, f64::NAN]),
            ResultSequence::new(vec![1.0, f64::NAN])
        );
        assert_ne!(
            ResultSequence::new(vec![1.0]),
            ResultSequence::new(vec![1.0, 2.0])
        );
    }
}
