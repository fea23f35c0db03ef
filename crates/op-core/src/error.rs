//! Core error types for OpenProject RS
//!
//! Maps to Ruby's error handling patterns and contract validation errors.

use thiserror::Error;

/// Core error type for all OpenProject operations
#[derive(Error, Debug)]
pub enum OpError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A constructor or builder was called without its required arguments.
    #[error("Invalid arguments: {message}")]
    Argument { message: String },

    /// A client supplied value could not be parsed into the attribute's type.
    #[error("Invalid format for {property}: expected {expected}, got {actual}")]
    InvalidFormat {
        property: String,
        expected: String,
        actual: String,
    },

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error for {key}: {message}")]
    Config { key: String, message: String },
}

impl OpError {
    pub fn argument(message: impl Into<String>) -> Self {
        OpError::Argument {
            message: message.into(),
        }
    }

    pub fn invalid_format(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        OpError::InvalidFormat {
            property: property.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        OpError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }
}

/// Contract validation error (mirrors OpenProject's Contract errors)
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Attribute {attribute} is invalid: {message}")]
    AttributeInvalid { attribute: String, message: String },
}

/// HTTP status code mapping for errors
impl OpError {
    pub fn status_code(&self) -> u16 {
        match self {
            OpError::NotFound { .. } => 404,
            OpError::Argument { .. } => 500,
            OpError::InvalidFormat { .. } | OpError::Contract(_) => 422,
            OpError::Internal(_) | OpError::Config { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OpError::not_found("WorkPackage", 1).status_code(), 404);
        assert_eq!(
            OpError::invalid_format("startDate", "ISO 8601 date", "tomorrow").status_code(),
            422
        );
        assert_eq!(OpError::argument("missing type").status_code(), 500);
    }

    #[test]
    fn test_contract_error_converts() {
        let err: OpError = ContractError::AttributeInvalid {
            attribute: "customField1".into(),
            message: "is not included in the list".into(),
        }
        .into();

        assert_eq!(err.status_code(), 422);
        assert_eq!(
            err.to_string(),
            "Contract violation: Attribute customField1 is invalid: is not included in the list"
        );
    }

    #[test]
    fn test_invalid_format_message() {
        let err = OpError::invalid_format("dueDate", "ISO 8601 date only", "2015-13-01");
        assert_eq!(
            err.to_string(),
            "Invalid format for dueDate: expected ISO 8601 date only, got 2015-13-01"
        );
    }
}
