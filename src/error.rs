//! Error types for sorting and formatting.
//!
//! All errors are raised synchronously to the immediate caller. Nothing in this
//! crate retries or suppresses a failure.
//!
//! ## Error Categories
//!
//! - **Argument Errors**: `update_order` called without an attribute
//! - **Config Errors**: malformed pipeline setup (e.g. `defaultType` given as a bare name)
//! - **Formatter Errors**: no converter registered for a column type, or the converter failed
//! - **Setup Errors**: sorting activated without a bound view
//!
//! ## Examples
//!
//! ```rust
//! use sortable_table::{Error, SortController};
//!
//! let mut controller = SortController::new();
//! let err = controller.update_order("", None).unwrap_err();
//! assert!(matches!(err, Error::Argument(_)));
//! ```

use std::fmt;
use thiserror::Error;

/// Failure reported by a single converter function.
///
/// Converters return this when a value cannot be rendered (for example a string
/// that is not a date). The pipeline wraps it into [`Error::FormatterNotFound`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ConvertError(pub String);

impl ConvertError {
    /// Creates a converter failure with a display message.
    pub fn new<T: fmt::Display>(msg: T) -> Self {
        ConvertError(msg.to_string())
    }
}

/// Represents all errors raised by the sort controller, the format pipeline and the table view.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A required argument was omitted
    #[error("{0}")]
    Argument(String),

    /// Malformed setup configuration
    #[error("{0}")]
    Config(String),

    /// No usable converter for a column type.
    ///
    /// Raised both when the type is unknown and when its converter fails, so the
    /// message is the same in either case. `source` is set only in the second case.
    #[error("Formatter function for type \"{type_name}\" does not exist")]
    FormatterNotFound {
        type_name: String,
        #[source]
        source: Option<ConvertError>,
    },

    /// The table view was set up without what sorting needs
    #[error("{0}")]
    Setup(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an argument error for an omitted parameter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::Error;
    ///
    /// let err = Error::missing_argument("property");
    /// assert_eq!(err.to_string(), "missing argument <property>");
    /// ```
    pub fn missing_argument(name: &str) -> Self {
        Error::Argument(format!("missing argument <{}>", name))
    }

    /// Creates a configuration error.
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Creates the error for a type with no registered converter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::Error;
    ///
    /// let err = Error::formatter_not_found("currency");
    /// assert!(err.to_string().contains("\"currency\""));
    /// ```
    pub fn formatter_not_found(type_name: &str) -> Self {
        Error::FormatterNotFound {
            type_name: type_name.to_string(),
            source: None,
        }
    }

    /// Creates the error for a converter that exists but failed on a value.
    pub fn formatter_failed(type_name: &str, source: ConvertError) -> Self {
        Error::FormatterNotFound {
            type_name: type_name.to_string(),
            source: Some(source),
        }
    }

    /// Creates a setup error.
    pub fn setup<T: fmt::Display>(msg: T) -> Self {
        Error::Setup(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the converter failure behind a [`Error::FormatterNotFound`], if any.
    ///
    /// `None` means the type itself was not registered.
    #[must_use]
    pub fn converter_failure(&self) -> Option<&ConvertError> {
        match self {
            Error::FormatterNotFound { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unknown_type_and_failure_share_message() {
        let missing = Error::formatter_not_found("date");
        let failed = Error::formatter_failed("date", ConvertError::new("not a date"));
        assert_eq!(missing.to_string(), failed.to_string());
        assert!(missing.converter_failure().is_none());
        assert_eq!(
            failed.converter_failure().map(|e| e.0.as_str()),
            Some("not a date")
        );
        assert!(failed.source().is_some());
    }

    #[test]
    fn test_setup_message() {
        let err = Error::setup("for sorting, pass a view instance on setup");
        assert_eq!(err.to_string(), "for sorting, pass a view instance on setup");
    }
}
