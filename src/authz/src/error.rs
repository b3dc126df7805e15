//! Error types for the authorization engine

use thiserror::Error;

use crate::model::{Permission, ResourceType};
use crate::reporter::AuthorizationDenied;

/// Authorization engine errors
///
/// `Denied` is the only outcome a well-formed request can produce. Every other
/// variant is a contract violation raised while building records or requests,
/// before any resolution takes place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthzError {
    /// The acting principal holds none of the acceptable permission paths
    #[error(transparent)]
    Denied(#[from] AuthorizationDenied),

    /// A permission path with no triples
    #[error("authorization path must contain at least one permission triple")]
    EmptyPath,

    /// A request with no paths
    #[error("authorization request must contain at least one path")]
    EmptyRequest,

    /// Empty resource instance identifier
    #[error("resource instance identifier cannot be empty")]
    EmptyInstanceId,

    /// A concrete instance id spelled like the wildcard
    #[error("resource instance identifier '{0}' is reserved for the wildcard instance")]
    ReservedInstanceId(String),

    /// Empty user or group identifier
    #[error("principal identifier cannot be empty")]
    EmptyPrincipalId,

    /// Authorization record without permissions
    #[error("authorization record must name at least one permission")]
    EmptyPermissionSet,

    /// Permission outside the resource type's vocabulary
    #[error("permission '{permission}' is not valid for resource type '{resource_type}'")]
    InvalidPermission {
        permission: Permission,
        resource_type: ResourceType,
    },

    /// Unrecognized permission or resource name
    #[error("unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

impl AuthzError {
    /// Returns the denial detail if this error is an authorization denial
    pub fn as_denied(&self) -> Option<&AuthorizationDenied> {
        match self {
            AuthzError::Denied(denied) => Some(denied),
            _ => None,
        }
    }
}
