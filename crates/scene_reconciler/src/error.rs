//! Error types for the host-config core

use crate::config::ConfigError;
use crate::native::ObjectId;
use thiserror::Error;

/// Errors raised while creating, updating, attaching or disposing instances
#[derive(Debug, Error)]
pub enum HostError {
    /// An element referenced a kind with no registered descriptor
    #[error("Unknown element kind `{0}`: no descriptor is registered for it")]
    UnknownKind(String),

    /// A child was attached to a parent that cannot hold it
    #[error("A `{child}` cannot be attached to a {parent}")]
    InvalidParent {
        /// Kind of the child being attached
        child: &'static str,
        /// Class label of the rejected parent
        parent: &'static str,
    },

    /// A prop carried a value of the wrong shape
    #[error("Invalid value for `{prop}` on `{kind}`: expected {expected}")]
    InvalidPropValue {
        /// Element kind that owns the prop
        kind: &'static str,
        /// Prop name
        prop: String,
        /// Description of the accepted value
        expected: &'static str,
    },

    /// A native object id does not resolve to a live object
    #[error("Native object {0:?} does not exist")]
    MissingObject(ObjectId),

    /// A native object is not of the class an operation needs
    #[error("Object {id:?} is a {found}, expected a {expected}")]
    WrongClass {
        /// Object looked up
        id: ObjectId,
        /// Class the operation needs
        expected: &'static str,
        /// Class actually found
        found: &'static str,
    },

    /// An instance has no live instance record
    #[error("Instance {0:?} has no live instance record")]
    MissingRecord(ObjectId),

    /// A removal named a parent the child is not attached to
    #[error("Instance {child:?} is not attached to {parent:?}")]
    NotAChild {
        /// Parent named by the removal
        parent: ObjectId,
        /// Child named by the removal
        child: ObjectId,
    },

    /// Dispose was requested for an instance still attached to a parent
    #[error("Instance {0:?} was disposed while still attached to a parent")]
    DisposeWhileAttached(ObjectId),

    /// A descriptor declares the same prop twice or as both simple and grouped
    #[error("Descriptor `{kind}` declares `{prop}` more than once")]
    DescriptorConflict {
        /// Descriptor kind
        kind: &'static str,
        /// Conflicting prop name
        prop: &'static str,
    },

    /// A render target is neither a surface nor a renderer
    #[error("Object {0:?} cannot be used as a render target")]
    NotAContainer(ObjectId),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HostError {
    /// Errors that indicate a missing registration rather than bad data
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownKind(_) | Self::DescriptorConflict { .. })
    }

    pub(crate) fn invalid_value(kind: &'static str, prop: &str, expected: &'static str) -> Self {
        Self::InvalidPropValue {
            kind,
            prop: prop.to_string(),
            expected,
        }
    }
}

/// Result alias used across the crate
pub type HostResult<T> = Result<T, HostError>;
