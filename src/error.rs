use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, RegressionErr>;

/// Failures reported by training, evaluation and configuration.
///
/// Every variant is a caller-input error detected before any computation
/// starts, so a failed call never leaves the model half updated.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionErr {
    /// Two sequences that must be paired by index have different lengths.
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A sequence that must hold at least one value is empty.
    EmptyInput(&'static str),
    /// A hyperparameter is outside its valid range.
    InvalidConfig(&'static str),
    /// A configuration document could not be read or parsed.
    Config(String),
}

impl Display for RegressionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionErr::DimensionMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "dimension mismatch for {what}: got {got} values, expected {expected}"
            ),
            RegressionErr::EmptyInput(what) => write!(f, "empty input: {what}"),
            RegressionErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            RegressionErr::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl Error for RegressionErr {}

/// Checks that `xs` and `ys` can be paired by index.
pub(crate) fn check_paired(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(RegressionErr::DimensionMismatch {
            what: "ys",
            got: ys.len(),
            expected: xs.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_sequence() {
        let err = RegressionErr::DimensionMismatch {
            what: "ys",
            got: 1,
            expected: 2,
        };

        assert_eq!(
            err.to_string(),
            "dimension mismatch for ys: got 1 values, expected 2"
        );
    }

    #[test]
    fn check_paired_accepts_equal_lengths() {
        assert!(check_paired(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
        assert!(check_paired(&[], &[]).is_ok());
    }

    #[test]
    fn check_paired_rejects_different_lengths() {
        let err = check_paired(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            RegressionErr::DimensionMismatch {
                got: 1,
                expected: 2,
                ..
            }
        ));
    }
}
