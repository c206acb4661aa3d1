//! Error types for mixin composition and member dispatch.
//!
//! Composition itself has a single failure mode,
//! [`InvalidCascadeTarget`](MixinError::InvalidCascadeTarget). The remaining
//! variants cover calling members on an [`Instance`](crate::Instance) and
//! parsing [`MemberPolicies`](crate::MemberPolicies) from text.

use thiserror::Error;

/// Errors that can occur while composing classes or calling their members.
#[derive(Debug, Error)]
pub enum MixinError {
    /// A `cascade` member received a scalar mixin value (boolean, number,
    /// or string).
    #[error("cascade can only decorate a method or structured value, `{member}` is {kind}")]
    InvalidCascadeTarget {
        /// Name of the offending member.
        member: String,
        /// Kind of the rejected value (e.g. `"number"`).
        kind: &'static str,
    },

    /// No class in the chain defines the member.
    #[error("unknown member: {0}")]
    UnknownMember(String),

    /// The member holds data, not a method.
    #[error("member is not callable: {0}")]
    NotCallable(String),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`MixinError`].
pub type Result<T> = std::result::Result<T, MixinError>;
