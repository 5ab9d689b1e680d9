//! Model error model.

use thiserror::Error;

use crate::value::ValueKind;

/// Result type used across the model layer.
pub type ModelResult<T> = Result<T, ModelError>;

/// Model-level error.
///
/// Keep this focused on deterministic failures of the model contract (unknown
/// attributes, type mismatches, incompatible archives). Equality and copying
/// never produce one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model type declares no attribute with this name.
    #[error("unknown property `{name}` on {class}")]
    UnknownProperty { class: &'static str, name: String },

    /// A boxed value does not match the attribute's declared kind.
    #[error("type mismatch for `{property}`: expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A boxed integer does not fit the attribute's native width.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// An archive cannot be decoded into the requested model type.
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// A class descriptor cannot back a dynamic class.
    #[error("invalid class: {0}")]
    InvalidClass(String),
}

impl ModelError {
    pub fn unknown_property(class: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownProperty {
            class,
            name: name.into(),
        }
    }

    pub fn type_mismatch(property: impl Into<String>, expected: ValueKind, found: ValueKind) -> Self {
        Self::TypeMismatch {
            property: property.into(),
            expected,
            found,
        }
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedArchive(msg.into())
    }

    pub fn invalid_class(msg: impl Into<String>) -> Self {
        Self::InvalidClass(msg.into())
    }
}
