//! Error types for seismic catalog analysis.
//!
//! Every variant carries a stable numeric code. The tens digit groups the
//! cause: 1x configuration, 2x input, 3x numerical.

use thiserror::Error;

/// Result type alias for catalog analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for catalog analysis.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown {kind} '{name}'")]
    UnknownAlgorithm { kind: String, name: String },

    // Input errors (20-29)
    #[error("length mismatch in {what}: {left} vs {right}")]
    LengthMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("insufficient data for {what}: need {needed}, got {got}")]
    InsufficientData {
        what: String,
        needed: usize,
        got: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Numerical errors (30-39)
    #[error("undefined statistic: {0}")]
    UndefinedStatistic(String),

    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Numerical errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidConfig(_) => 10,
            Error::UnknownAlgorithm { .. } => 11,
            Error::LengthMismatch { .. } => 20,
            Error::EmptyInput(_) => 21,
            Error::InsufficientData { .. } => 22,
            Error::InvalidInput(_) => 23,
            Error::UndefinedStatistic(_) => 30,
            Error::NumericalInstability(_) => 31,
        }
    }

    /// Shorthand for [`Error::LengthMismatch`].
    pub fn length_mismatch(what: impl Into<String>, left: usize, right: usize) -> Self {
        Error::LengthMismatch {
            what: what.into(),
            left,
            right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let cases = [
            (Error::InvalidConfig("x".into()), 10),
            (
                Error::UnknownAlgorithm {
                    kind: "window method".into(),
                    name: "foo".into(),
                },
                11,
            ),
            (Error::length_mismatch("table", 1, 2), 20),
            (Error::EmptyInput("catalog".into()), 21),
            (
                Error::InsufficientData {
                    what: "bootstrap".into(),
                    needed: 2,
                    got: 1,
                },
                22,
            ),
            (Error::InvalidInput("nan".into()), 23),
            (Error::UndefinedStatistic("b-value".into()), 30),
            (Error::NumericalInstability("h".into()), 31),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn unknown_algorithm_message() {
        let err = Error::UnknownAlgorithm {
            kind: "window method".into(),
            name: "GardnerKnopoffTyp".into(),
        };
        assert_eq!(err.to_string(), "unknown window method 'GardnerKnopoffTyp'");
    }

    #[test]
    fn length_mismatch_message() {
        let err = Error::length_mismatch("completeness table", 3, 2);
        assert_eq!(err.to_string(), "length mismatch in completeness table: 3 vs 2");
    }
}
