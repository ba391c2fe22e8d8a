//! Error types for the export pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ExportError>;

/// Export pipeline error types
#[derive(Error, Debug)]
pub enum ExportError {
    /// Malformed input to the resampler or one of the encoders
    #[error("invalid input ({context}): {message}")]
    InvalidInput {
        /// Channel, field or stage the problem was found in
        context: String,
        /// What is wrong, including the offending index where there is one
        message: String,
    },

    /// Burnout time does not fall inside the raw time grid
    #[error("burnout boundary not found: t_burnout = {t_burnout} s is outside the time grid [{first}, {last}] s")]
    BoundaryNotFound {
        /// Requested burnout time (s)
        t_burnout: f64,
        /// First sample time of the grid (s), NaN for an empty grid
        first: f64,
        /// Last sample time of the grid (s), NaN for an empty grid
        last: f64,
    },

    /// Target directory missing or artifact not writable
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// File or directory the operation failed on
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn invalid(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::InvalidInput {
            context: context.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any file was touched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExportError::InvalidInput { .. } | ExportError::BoundaryNotFound { .. }
        )
    }
}
