//! Error types for query construction and option validation.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolrqError>;

/// Errors raised while building queries or validating options.
///
/// Every error is raised at the call that received the offending input,
/// never deferred to parameter generation.
#[derive(Debug, Error)]
pub enum SolrqError {
    /// The field is not declared in the schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A value cannot be coerced to the declared field type.
    #[error("Type error: {0}")]
    Type(String),

    /// A numeric value does not fit the declared field type.
    #[error("Range error: {0}")]
    Range(String),

    /// An option family rejected a setting name, value or field.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed builder input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Schema document could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolrqError {
    /// Create an unknown field error.
    pub fn unknown_field<S: Into<String>>(name: S) -> Self {
        SolrqError::UnknownField(name.into())
    }

    /// Create a type error.
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        SolrqError::Type(msg.into())
    }

    /// Create a range error.
    pub fn range_error<S: Into<String>>(msg: S) -> Self {
        SolrqError::Range(msg.into())
    }

    /// Create a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SolrqError::Config(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SolrqError::InvalidArgument(msg.into())
    }

    pub fn is_unknown_field(&self) -> bool {
        matches!(self, SolrqError::UnknownField(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, SolrqError::Type(_))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, SolrqError::Range(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, SolrqError::Config(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SolrqError::InvalidArgument(_))
    }

    /// Re-label a codec or lookup failure as a configuration error.
    ///
    /// Option families own their validation, so anything they reject is
    /// reported as `Config` regardless of where the check happened.
    pub(crate) fn into_config(self) -> Self {
        match self {
            SolrqError::Config(_) => self,
            other => SolrqError::Config(other.to_string()),
        }
    }
}
