use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Payment failed: {message}")]
    PaymentError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unexpected response from {service}: {detail}")]
    UnexpectedResponseError {
        service: &'static str,
        detail: String,
    },
}

impl BackendError {
    /// Card-decline style failures that should be surfaced to the payer,
    /// as opposed to infrastructure errors that should not.
    pub fn is_payment(&self) -> bool {
        matches!(self, BackendError::PaymentError { .. })
    }

    pub fn payment<S: Into<String>>(message: S) -> Self {
        BackendError::PaymentError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
