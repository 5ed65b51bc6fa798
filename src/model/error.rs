//! Estimator errors

use thiserror::Error;

/// Errors raised by the models and the simulator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing external data: {0}")]
    MissingExternalData(String),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidInput(msg.into())
    }

    pub(crate) fn missing(msg: impl Into<String>) -> Self {
        SimError::MissingExternalData(msg.into())
    }
}
