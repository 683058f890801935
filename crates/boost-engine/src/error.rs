//! Boost engine error types.

use thiserror::Error;

/// Errors returned by boost pricing and lifecycle operations.
#[derive(Error, Debug)]
pub enum BoostError {
    /// Input rejected before touching the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Product not found (or not owned by the caller).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Boost not found (or not owned by the caller).
    #[error("Boost not found: {0}")]
    BoostNotFound(String),

    /// Status change not allowed from the boost's current status.
    #[error("Invalid boost transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The boost changed between read and write.
    #[error("Boost modified concurrently: {0}")]
    Conflict(String),

    /// Store read or write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BoostError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, BoostError::Persistence(_) | BoostError::Conflict(_))
    }

    /// Whether the error names a missing product or boost.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BoostError::ProductNotFound(_) | BoostError::BoostNotFound(_)
        )
    }
}

#[cfg(feature = "storage")]
impl From<boost_db::DbError> for BoostError {
    fn from(e: boost_db::DbError) -> Self {
        BoostError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for BoostError {
    fn from(e: serde_json::Error) -> Self {
        BoostError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for BoostError {
    fn from(e: toml::de::Error) -> Self {
        BoostError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BoostError::Persistence("disk I/O".into()).is_transient());
        assert!(BoostError::Conflict("boost-1".into()).is_transient());
        assert!(!BoostError::Validation("duration".into()).is_transient());
        assert!(!BoostError::BoostNotFound("boost-1".into()).is_transient());
    }

    #[test]
    fn test_transition_message() {
        let err = BoostError::InvalidTransition {
            from: "cancelled".into(),
            to: "active".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid boost transition from cancelled to active"
        );
    }
}
