//! Error types for the mock CRM core.

use thiserror::Error;

/// Result type for core operations.
pub type CrmResult<T> = Result<T, CrmError>;

/// Errors that can occur in mock CRM operations.
///
/// Every failure is deterministic and raised before any state is touched:
/// a failed call never appends a contact or advances the id counter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrmError {
    /// The `since` filter could not be parsed as an ISO-8601 timestamp.
    #[error("Invalid 'since' date format. Use ISO format.")]
    InvalidSince {
        /// The rejected input.
        value: String,
    },

    /// A numeric query parameter was not an integer or was out of range.
    #[error("Invalid '{name}' parameter: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A create payload violated the contact schema.
    #[error("Invalid contact payload: {message}")]
    InvalidPayload {
        /// Description of the violation.
        message: String,
    },

    /// No contact has the requested id.
    #[error("Contact not found")]
    ContactNotFound {
        /// The id that was looked up.
        id: String,
    },
}

impl CrmError {
    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        CrmError::InvalidPayload {
            message: message.into(),
        }
    }

    /// Returns true if the caller sent bad input (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CrmError::InvalidSince { .. }
                | CrmError::InvalidParameter { .. }
                | CrmError::InvalidPayload { .. }
                | CrmError::ContactNotFound { .. }
        )
    }

    /// Returns true if this is a lookup miss rather than a validation failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrmError::ContactNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        let missing = CrmError::ContactNotFound {
            id: "nope".into(),
        };
        assert!(missing.is_client_error());
        assert!(missing.is_not_found());

        let bad = CrmError::InvalidSince {
            value: "yesterday".into(),
        };
        assert!(bad.is_client_error());
        assert!(!bad.is_not_found());
    }

    #[test]
    fn error_display() {
        let err = CrmError::ContactNotFound {
            id: "mock_crm_1".into(),
        };
        assert_eq!(err.to_string(), "Contact not found");

        let err = CrmError::InvalidParameter {
            name: "offset",
            value: "-3".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("offset"));
        assert!(msg.contains("-3"));
    }
}
