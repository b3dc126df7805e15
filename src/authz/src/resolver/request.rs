//! Authorization request types: triples, paths and requests

use serde::Serialize;
use std::fmt;

use crate::error::{AuthzError, Result};
use crate::model::{Permission, ResourceInstance, ResourceModel, ResourceType};

/// One required permission on one resource scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PermissionTriple {
    pub resource_type: ResourceType,
    pub instance: ResourceInstance,
    pub permission: Permission,
}

impl PermissionTriple {
    /// Creates a triple
    ///
    /// # Errors
    ///
    /// Returns `InvalidPermission` when `permission` is outside the
    /// vocabulary of `resource_type`.
    pub fn new(
        resource_type: ResourceType,
        instance: ResourceInstance,
        permission: Permission,
    ) -> Result<Self> {
        if !ResourceModel::new().is_valid(resource_type, permission) {
            return Err(AuthzError::InvalidPermission {
                permission,
                resource_type,
            });
        }

        Ok(Self {
            resource_type,
            instance,
            permission,
        })
    }
}

impl fmt::Display for PermissionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}({})",
            self.permission,
            self.resource_type.name(),
            self.instance
        )
    }
}

/// Triples that must all hold for the path to succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationPath {
    triples: Vec<PermissionTriple>,
}

impl AuthorizationPath {
    /// Creates a path from its triples
    ///
    /// # Errors
    ///
    /// Returns `EmptyPath` when `triples` is empty.
    pub fn new(triples: Vec<PermissionTriple>) -> Result<Self> {
        if triples.is_empty() {
            return Err(AuthzError::EmptyPath);
        }
        Ok(Self { triples })
    }

    /// Path consisting of one triple
    pub fn single(triple: PermissionTriple) -> Self {
        Self {
            triples: vec![triple],
        }
    }

    pub fn triples(&self) -> &[PermissionTriple] {
        &self.triples
    }

    /// First triple, reported when the path fails
    pub fn primary(&self) -> &PermissionTriple {
        &self.triples[0]
    }
}

impl fmt::Display for AuthorizationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.triples.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(" AND "))
    }
}

/// Alternative paths, any one of which authorizes the request
///
/// # Examples
///
/// ```
/// use procflow_authz::model::{Permission, ResourceInstance, ResourceType};
/// use procflow_authz::resolver::{AuthorizationPath, AuthorizationRequest, PermissionTriple};
///
/// let t1 = ResourceInstance::id("t1").unwrap();
/// let request = AuthorizationRequest::new(vec![
///     AuthorizationPath::single(PermissionTriple::new(ResourceType::WorkItem, t1.clone(), Permission::Assign).unwrap()),
///     AuthorizationPath::single(PermissionTriple::new(ResourceType::WorkItem, t1, Permission::Update).unwrap()),
/// ])
/// .unwrap();
/// assert_eq!(request.paths().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRequest {
    paths: Vec<AuthorizationPath>,
}

impl AuthorizationRequest {
    /// Creates a request from its paths, kept in the given order
    ///
    /// # Errors
    ///
    /// Returns `EmptyRequest` when `paths` is empty.
    pub fn new(paths: Vec<AuthorizationPath>) -> Result<Self> {
        if paths.is_empty() {
            return Err(AuthzError::EmptyRequest);
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[AuthorizationPath] {
        &self.paths
    }
}
