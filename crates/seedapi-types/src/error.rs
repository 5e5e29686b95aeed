use thiserror::Error;

/// Errors produced while loading or interpreting descriptors and data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("descriptor file must be a mapping of resource names to descriptors")]
    NotAMapping,

    #[error("descriptor file declares no resources")]
    Empty,

    #[error("invalid resource name {0:?}: use only letters, digits, '-', '.', '_' and '~'")]
    InvalidName(String),

    #[error("resource `{resource}`: {reason}")]
    InvalidDescriptor { resource: String, reason: String },

    #[error("unsupported descriptor file extension: {0:?}")]
    UnsupportedFormat(String),

    #[error("generated data for `{resource}` must be an object or an array of objects")]
    InvalidData { resource: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
