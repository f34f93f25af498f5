//! Error types for the shift scheduling engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while generating, persisting,
//! or aggregating shifts.

use thiserror::Error;

/// The main error type for the shift scheduling engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// Uniqueness-constraint hits during create/upsert are deliberately NOT
/// errors; they are reported as successful idempotent outcomes (see
/// [`crate::store::CreateOutcome`]).
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::InvalidTime {
///     value: "25:99".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid time '25:99': expected HH:MM");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A wall-clock time string could not be parsed as `HH:MM`.
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// The value that failed to parse.
        value: String,
    },

    /// A calendar date string could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The value that failed to parse.
        value: String,
    },

    /// A required request field was missing or empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The field that was missing.
        field: String,
    },

    /// A shift length could not be converted to a whole number of minutes.
    #[error("Invalid shift length: {value}")]
    InvalidShiftLength {
        /// The offending length value.
        value: String,
    },

    /// The requested record does not exist or is outside the caller's
    /// tenant scope. The two cases are indistinguishable on purpose.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record ("Shift", "Agent").
        entity: String,
        /// The identifier that was requested.
        id: String,
    },

    /// An edit would move a shift into a slot already occupied by a
    /// different record.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting slot.
        message: String,
    },

    /// The storage backend cannot run the operation atomically. Consumed
    /// internally by the bulk-upsert fallback; never silent.
    #[error("Storage backend does not support transactions")]
    TransactionUnsupported,
}

impl EngineError {
    /// Convenience constructor for [`EngineError::NotFound`].
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
