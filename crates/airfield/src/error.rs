//! Error types for airfield.
//!
//! Domain failures (malformed rows, duplicate and unknown flights) share one
//! enum with the I/O, CSV and configuration failures around them, so every
//! public operation returns the same [`Result`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for airfield operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// A CSV row is structurally invalid or carries an unparseable time.
    #[error("malformed row: {reason}")]
    MalformedRow {
        /// What is wrong with the row.
        reason: String,
    },

    /// A flight with the same identifier is already registered.
    #[error("duplicate flight ID: {flight_id}")]
    DuplicateFlight {
        /// The offending identifier.
        flight_id: String,
    },

    /// No flight is registered under the requested identifier.
    #[error("flight does not exist: {flight_id}")]
    NoSuchFlight {
        /// The requested identifier.
        flight_id: String,
    },

    // === Storage Errors ===
    /// Reading or writing CSV framing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to open a flights file.
    #[error("failed to open {path}: {source}")]
    FileOpen {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for airfield operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed row error.
    #[must_use]
    pub fn malformed_row(reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            reason: reason.into(),
        }
    }

    /// Create a duplicate flight error.
    #[must_use]
    pub fn duplicate_flight(flight_id: impl Into<String>) -> Self {
        Self::DuplicateFlight {
            flight_id: flight_id.into(),
        }
    }

    /// Create a missing flight error.
    #[must_use]
    pub fn no_such_flight(flight_id: impl Into<String>) -> Self {
        Self::NoSuchFlight {
            flight_id: flight_id.into(),
        }
    }

    /// Prefix a malformed row error with the line it came from.
    ///
    /// Other errors pass through unchanged.
    #[must_use]
    pub fn at_line(self, line: u64) -> Self {
        match self {
            Self::MalformedRow { reason } => Self::MalformedRow {
                reason: format!("line {line}: {reason}"),
            },
            other => other,
        }
    }

    /// Check if this error was caused by bad caller input rather than the
    /// environment.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedRow { .. } | Self::DuplicateFlight { .. } | Self::NoSuchFlight { .. }
        )
    }

    /// Check if this error means the requested flight does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchFlight { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::duplicate_flight("LY001");
        assert_eq!(err.to_string(), "duplicate flight ID: LY001");

        let err = Error::no_such_flight("LY404");
        assert_eq!(err.to_string(), "flight does not exist: LY404");

        let err = Error::malformed_row("missing departure");
        assert_eq!(err.to_string(), "malformed row: missing departure");
    }

    #[test]
    fn test_at_line_prefixes_malformed_rows() {
        let err = Error::malformed_row("too few fields").at_line(7);
        assert_eq!(err.to_string(), "malformed row: line 7: too few fields");
    }

    #[test]
    fn test_at_line_leaves_other_errors() {
        let err = Error::duplicate_flight("A1").at_line(3);
        assert!(matches!(err, Error::DuplicateFlight { ref flight_id } if flight_id == "A1"));
    }

    #[test]
    fn test_is_invalid_input() {
        assert!(Error::malformed_row("x").is_invalid_input());
        assert!(Error::duplicate_flight("x").is_invalid_input());
        assert!(Error::no_such_flight("x").is_invalid_input());

        let io_err = std::io::Error::other("disk full");
        assert!(!Error::from(io_err).is_invalid_input());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::no_such_flight("x").is_not_found());
        assert!(!Error::duplicate_flight("x").is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_file_open_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::FileOpen {
            path: PathBuf::from("/data/flights.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/flights.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "negative ground time".to_string(),
        };
        assert!(err.to_string().contains("negative ground time"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
