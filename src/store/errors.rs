//! Snapshot store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A failure while loading table snapshots or resolving plant context.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file could not be read.
    #[error("Failed to read snapshot '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Snapshot file did not contain the expected structure.
    #[error("Malformed snapshot '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Context lookup for a plant failed. Callers treat this as
    /// best-effort; the formatter logs and omits the field.
    #[error("Context lookup failed for plant '{plant_id}': {reason}")]
    ContextLookup { plant_id: String, reason: String },
}

impl StoreError {
    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn context_lookup(plant_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContextLookup {
            plant_id: plant_id.into(),
            reason: reason.into(),
        }
    }
}
