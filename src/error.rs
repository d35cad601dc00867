//! Error types for construction, decoding and fallible arithmetic.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`HugeInt`](crate::HugeInt).
#[derive(Debug, Error)]
pub enum Error {
    /// The input cannot be converted to an integer.
    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    /// The compressed payload of a huge value could not be decoded.
    #[error("corrupted data: {message}")]
    DataCorruption {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operator name or operand count not covered by the dispatch table.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("division by zero")]
    DivisionByZero,

    /// The value does not fit the requested native type.
    #[error("overflow: {message}")]
    Overflow { message: String },
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidValue {
            message: message.into(),
        }
    }

    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::DataCorruption {
            message: message.into(),
            source: None,
        }
    }

    /// Create a corrupted data error wrapping the decoder's own error.
    pub fn corrupted_by<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::DataCorruption {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedOperation(message.into())
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Error::Overflow {
            message: message.into(),
        }
    }

    /// Short stable name of the error kind, suitable for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidValue { .. } => "invalid_value",
            Error::DataCorruption { .. } => "data_corruption",
            Error::UnsupportedOperation(_) => "unsupported_operation",
            Error::DivisionByZero => "division_by_zero",
            Error::Overflow { .. } => "overflow",
        }
    }
}
