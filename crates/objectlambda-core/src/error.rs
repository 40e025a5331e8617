//! Pipeline error types.
//!
//! Defines [`GetObjectError`], the domain error enum for the GetObject
//! pipeline. Every variant maps to exactly one caller-facing error code
//! through [`GetObjectError::code`]; nothing escapes the pipeline
//! unconverted.

use http::StatusCode;

/// Error code string attached to caller-facing validation and extraction
/// failures.
pub const INVALID_REQUEST: &str = "InvalidRequest";

/// GetObject pipeline error.
///
/// Validation and extraction failures are recoverable locally into an
/// `InvalidRequest` response; origin failures are passed through with the
/// origin's own status so the caller can distinguish "bad request" from
/// "origin unavailable" from "not found".
#[derive(Debug, thiserror::Error)]
pub enum GetObjectError {
    /// The inbound request is structurally malformed. Detected before any
    /// origin I/O.
    #[error("Invalid request: {message}")]
    Validation {
        /// Description of the malformed field.
        message: String,
    },

    /// The `Range` selector is malformed or unsatisfiable against the
    /// transformed object.
    #[error("Invalid range: {message}")]
    InvalidRange {
        /// Description of what made the range invalid.
        message: String,
    },

    /// The `partNumber` selector does not address an existing part of the
    /// transformed object.
    #[error("Invalid part number: {message}")]
    InvalidPartNumber {
        /// Description of what made the part number invalid.
        message: String,
    },

    /// The backing store answered with a non-2xx, non-304 status.
    #[error("Origin returned status {status}")]
    Origin {
        /// The origin's own HTTP status code.
        status: StatusCode,
    },

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GetObjectError {
    /// The caller-facing error code for this error.
    ///
    /// Validation and extraction errors share the `InvalidRequest` code;
    /// origin and internal failures carry their own codes.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::InvalidRange { .. } | Self::InvalidPartNumber { .. } => {
                INVALID_REQUEST
            }
            Self::Origin { .. } => "OriginError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Whether this error is recoverable into an `InvalidRequest`
    /// (400-equivalent) response.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        self.code() == INVALID_REQUEST
    }
}

/// Convenience result type for pipeline operations.
pub type GetObjectResult<T> = Result<T, GetObjectError>;
