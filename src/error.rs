//! Error types for featsel operations.
//!
//! Every failure a search can hit is one of a handful of structural
//! conditions. None of them is transient, so nothing in the crate retries.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FeatselError>;

/// Main error type for feature-subset search.
///
/// # Examples
///
/// ```
/// use featsel::error::FeatselError;
///
/// let err = FeatselError::InvalidMaskLength { expected: 10, actual: 9 };
/// assert!(err.to_string().contains("mask length"));
/// ```
#[derive(Debug, Error)]
pub enum FeatselError {
    /// Feature mask (or parameter vector) length does not match the column count.
    #[error("Invalid mask length: expected {expected} columns, got mask length {actual}")]
    InvalidMaskLength {
        /// Number of feature columns
        expected: usize,
        /// Length of the offending mask
        actual: usize,
    },

    /// Train/test labels cannot be reconciled into one class space.
    #[error("Label mismatch: {message}")]
    LabelMismatch {
        /// What could not be reconciled
        message: String,
    },

    /// The classifier refused to train.
    #[error("Training error: {message}")]
    TrainingError {
        /// Reason reported by the classifier
        message: String,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {param} = {value}, expected {constraint}")]
    ConfigurationError {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The run was stopped by its deadline or by cancellation.
    #[error("Search aborted: {reason}")]
    Aborted {
        /// Deadline or cancellation
        reason: String,
    },

    /// Malformed input data (CSV parsing, empty datasets, bad splits).
    #[error("Data error: {message}")]
    Data {
        /// Error description
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeatselError {
    /// Shorthand for [`FeatselError::ConfigurationError`].
    pub fn config(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::ConfigurationError {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Shorthand for [`FeatselError::Data`].
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Shorthand for [`FeatselError::TrainingError`].
    pub fn training(message: impl Into<String>) -> Self {
        Self::TrainingError {
            message: message.into(),
        }
    }

    /// Shorthand for [`FeatselError::LabelMismatch`].
    pub fn label_mismatch(message: impl Into<String>) -> Self {
        Self::LabelMismatch {
            message: message.into(),
        }
    }

    /// Whether this error was raised before any search started.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError { .. })
    }
}

impl From<csv::Error> for FeatselError {
    fn from(err: csv::Error) -> Self {
        Self::data(format!("CSV: {err}"))
    }
}

impl From<toml::de::Error> for FeatselError {
    fn from(err: toml::de::Error) -> Self {
        Self::data(format!("TOML: {err}"))
    }
}

impl From<serde_json::Error> for FeatselError {
    fn from(err: serde_json::Error) -> Self {
        Self::data(format!("JSON: {err}"))
    }
}
