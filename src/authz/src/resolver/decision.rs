//! Authorization decision types

use serde::{Deserialize, Serialize};

use super::request::PermissionTriple;
use crate::model::{Permission, ResourceInstance, ResourceType};

/// A permission the principal would have needed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissingAuthorization {
    pub permission: Permission,
    pub resource_type: ResourceType,
    pub resource_instance: ResourceInstance,
}

impl From<&PermissionTriple> for MissingAuthorization {
    fn from(triple: &PermissionTriple) -> Self {
        Self {
            permission: triple.permission,
            resource_type: triple.resource_type,
            resource_instance: triple.instance.clone(),
        }
    }
}

/// Outcome of one resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether any path succeeded
    pub authorized: bool,

    /// Index of the first succeeding path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_path: Option<usize>,

    /// Primary triple of every path, in request order, when denied
    #[serde(default)]
    pub missing: Vec<MissingAuthorization>,
}

impl Decision {
    /// Allow decision granted by path `path_index`
    pub fn allow(path_index: usize) -> Self {
        Self {
            authorized: true,
            granted_path: Some(path_index),
            missing: Vec::new(),
        }
    }

    /// Deny decision listing what was missing
    ///
    /// `missing` must not be empty; a deny always names at least one
    /// authorization the principal would have needed.
    pub fn deny(missing: Vec<MissingAuthorization>) -> Self {
        debug_assert!(!missing.is_empty(), "deny decision without missing authorizations");
        Self {
            authorized: false,
            granted_path: None,
            missing,
        }
    }

    /// Allow decision that did not consult any record
    pub fn bypass() -> Self {
        Self {
            authorized: true,
            granted_path: None,
            missing: Vec::new(),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Whether a missing entry names `permission` on `instance`
    pub fn is_missing(&self, permission: Permission, instance: &str) -> bool {
        self.missing
            .iter()
            .any(|m| m.permission == permission && m.resource_instance.as_str() == instance)
    }
}
