//! API error handling
//!
//! Turns core errors into HTTP status codes with HAL+JSON error documents.
//! The HTTP layer embedding the representers answers with these.

use op_core::error::{ContractError, OpError};
use serde_json::Value;

use crate::representers::hal::{to_value, HalError};

/// API error: status code plus HAL error document
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub body: HalError,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn to_value(&self) -> Value {
        to_value(&self.body).unwrap_or(Value::Null)
    }
}

impl From<OpError> for ApiError {
    fn from(error: OpError) -> Self {
        let status = error.status_code();
        let body = match &error {
            OpError::NotFound { entity, value, .. } => HalError::new(
                "NotFound",
                format!("The requested {} with id {} does not exist.", entity, value),
            ),
            OpError::InvalidFormat { property, .. } => {
                HalError::new("PropertyFormatError", error.to_string()).with_attribute(property.clone())
            }
            OpError::Contract(ContractError::AttributeInvalid { attribute, .. }) => {
                HalError::new("PropertyConstraintViolation", error.to_string())
                    .with_attribute(attribute.clone())
            }
            OpError::Argument { .. } | OpError::Internal(_) | OpError::Config { .. } => {
                tracing::error!(error = %error, "internal error while representing");
                HalError::new("InternalServerError", "An internal error has occured.")
            }
        };

        ApiError { status, body }
    }
}
