//! Evaluation errors.
//!
//! Every failure the engine can raise is a variant of [`EvalError`]. Errors
//! are host-level: scripts have no way to catch them, so they propagate with
//! `?` out of the dispatcher and abort the whole evaluation unchanged.
//!
//! Factory functions (e.g. `unbound_name()`) are the constructors used
//! throughout the crate; they are `#[cold]` to keep the happy path tight.

use ember_ir::{BinaryOp, NodeId, NodeKind};
use thiserror::Error;

use crate::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Identifier not found anywhere in the scope chain.
    #[error("unbound name `{name}`")]
    UnboundName { name: String },

    /// Call target resolved to something other than a callable.
    #[error("`{name}` is not callable (found {type_name})")]
    NotCallable {
        name: String,
        type_name: &'static str,
    },

    /// Member read on a null base.
    #[error("cannot read member `{member}` of null")]
    NullReference { member: String },

    /// Indexed write through a name bound to null.
    #[error("cannot assign an index of `{name}`: it is null")]
    NullTarget { name: String },

    /// Member access with an empty field name.
    #[error("member access with an empty identifier")]
    EmptyIdentifier,

    /// Operation applied to an incompatible value variant.
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// A built-in's required argument is absent or has the wrong capability.
    #[error("{builtin}: {message}")]
    MissingArgument {
        builtin: &'static str,
        message: String,
    },

    /// The parser handed over a node whose slots do not match its kind.
    #[error("malformed `{kind}` node: slot {slot} must hold {expected}")]
    MalformedNode {
        kind: String,
        slot: u8,
        expected: &'static str,
    },

    #[error("maximum call depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },

    /// A closure invoked after the scope it captured was reclaimed.
    #[error("`{name}` closes over a scope that no longer exists")]
    StaleScope { name: String },

    /// Host I/O failure, e.g. reading standard input.
    #[error("host error: {message}")]
    Host { message: String },
}

impl EvalError {
    /// Stable label for the error category.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::UnboundName { .. } => "UnboundName",
            Self::NotCallable { .. } => "NotCallable",
            Self::NullReference { .. } => "NullReference",
            Self::NullTarget { .. } => "NullTarget",
            Self::EmptyIdentifier => "EmptyIdentifier",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::MissingArgument { .. } => "MissingArgument",
            Self::MalformedNode { .. } => "MalformedNode",
            Self::RecursionLimit { .. } => "RecursionLimit",
            Self::StaleScope { .. } => "StaleScope",
            Self::Host { .. } => "Host",
        }
    }
}

// Name resolution

#[cold]
pub fn unbound_name(name: &str) -> EvalError {
    EvalError::UnboundName {
        name: name.to_owned(),
    }
}

#[cold]
pub fn not_callable(name: &str, value: &Value) -> EvalError {
    EvalError::NotCallable {
        name: name.to_owned(),
        type_name: value.type_name(),
    }
}

// Access

#[cold]
pub fn null_reference(member: &str) -> EvalError {
    EvalError::NullReference {
        member: member.to_owned(),
    }
}

#[cold]
pub fn null_target(name: &str) -> EvalError {
    EvalError::NullTarget {
        name: name.to_owned(),
    }
}

#[cold]
pub fn empty_identifier() -> EvalError {
    EvalError::EmptyIdentifier
}

#[cold]
pub fn no_member(member: &str, target: &Value) -> EvalError {
    type_mismatch(format!(
        "cannot read member `{member}` of {}",
        target.type_name()
    ))
}

#[cold]
pub fn not_indexable(name: &str, target: &Value) -> EvalError {
    type_mismatch(format!("`{name}` is not indexable ({})", target.type_name()))
}

#[cold]
pub fn invalid_array_index(index: &Value) -> EvalError {
    type_mismatch(format!(
        "array index must be a non-negative integer, got {}",
        index.type_name()
    ))
}

// Operators

#[cold]
pub fn type_mismatch(message: impl Into<String>) -> EvalError {
    EvalError::TypeMismatch {
        message: message.into(),
    }
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    type_mismatch(format!(
        "operator `{}` cannot be applied to {} and {}",
        op.as_symbol(),
        left.type_name(),
        right.type_name()
    ))
}

// Built-ins

#[cold]
pub fn missing_argument(builtin: &'static str, message: impl Into<String>) -> EvalError {
    EvalError::MissingArgument {
        builtin,
        message: message.into(),
    }
}

// Engine

#[cold]
pub fn malformed_node(kind: &NodeKind, slot: u8, expected: &'static str) -> EvalError {
    EvalError::MalformedNode {
        kind: kind.as_tag().to_owned(),
        slot,
        expected,
    }
}

#[cold]
pub fn dangling_node(id: NodeId) -> EvalError {
    EvalError::MalformedNode {
        kind: format!("{id:?}"),
        slot: 0,
        expected: "a node of this program",
    }
}

#[cold]
pub fn recursion_limit(depth: usize) -> EvalError {
    EvalError::RecursionLimit { depth }
}

#[cold]
pub fn stale_scope(name: &str) -> EvalError {
    EvalError::StaleScope {
        name: name.to_owned(),
    }
}

#[cold]
pub fn host_error(message: impl Into<String>) -> EvalError {
    EvalError::Host {
        message: message.into(),
    }
}
