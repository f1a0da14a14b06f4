use thiserror::Error;

/// Errors produced while validating upload input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown product type: {0:?} (expected \"TV\" or \"AC\")")]
    UnknownProductType(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no image uploaded")]
    MissingImage,

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Result alias for type-level validation.
pub type TypeResult<T> = Result<T, TypeError>;
