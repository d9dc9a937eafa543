//! Errors produced while reading a template expression
//!
//! None of these reach the caller of a render: each one is rendered in place
//! of the expression that caused it, and its `Display` text is the diagnostic.

use thiserror::Error;

/// Failures parsing an expression or resolving its type reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// The expression names a type but no member chain
    #[error("missing member")]
    MissingMember,

    /// The type reference does not match `base[entityId]@assembly`
    #[error("parsing type name failed")]
    InvalidTypeName { text: String },

    /// No registered type matches the reference
    #[error("{name} not found")]
    TypeNotFound { name: String },
}

impl ExpressionError {
    pub fn invalid_type_name(text: impl Into<String>) -> Self {
        Self::InvalidTypeName { text: text.into() }
    }

    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::TypeNotFound { name: name.into() }
    }
}
