//! Authorization record types

use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::model::{Permission, PermissionSet, Principal, ResourceInstance, ResourceModel, ResourceType};

/// Whether a record adds or removes permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Grant,
    Revoke,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Grant => f.write_str("GRANT"),
            RecordKind::Revoke => f.write_str("REVOKE"),
        }
    }
}

/// Grant or revoke evidence for one principal on one resource scope
///
/// Records are validated on construction and immutable afterwards: the
/// permission set is non-empty and every permission is valid for the
/// resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRecord {
    kind: RecordKind,
    resource_type: ResourceType,
    instance: ResourceInstance,
    principal: Principal,
    permissions: PermissionSet,
}

impl AuthorizationRecord {
    /// Creates a validated record
    ///
    /// # Errors
    ///
    /// Returns `EmptyPermissionSet` or `InvalidPermission` when the
    /// permissions do not fit the resource type.
    pub fn new(
        kind: RecordKind,
        resource_type: ResourceType,
        instance: ResourceInstance,
        principal: Principal,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<Self> {
        let permissions: PermissionSet = permissions.into_iter().collect();
        ResourceModel::new().validate(resource_type, &permissions)?;

        Ok(Self {
            kind,
            resource_type,
            instance,
            principal,
            permissions,
        })
    }

    pub fn grant(
        resource_type: ResourceType,
        instance: ResourceInstance,
        principal: Principal,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<Self> {
        Self::new(RecordKind::Grant, resource_type, instance, principal, permissions)
    }

    pub fn revoke(
        resource_type: ResourceType,
        instance: ResourceInstance,
        principal: Principal,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<Self> {
        Self::new(RecordKind::Revoke, resource_type, instance, principal, permissions)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn instance(&self) -> &ResourceInstance {
        &self.instance
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn is_grant(&self) -> bool {
        self.kind == RecordKind::Grant
    }

    pub fn is_revoke(&self) -> bool {
        self.kind == RecordKind::Revoke
    }

    /// Whether the record's permission set covers `permission` (`All` covers everything)
    pub fn covers(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission) || self.permissions.contains(&Permission::All)
    }

    /// Whether the record's scope applies to a lookup for `instance`
    pub fn applies_to(&self, instance: &ResourceInstance) -> bool {
        self.instance.covers(instance)
    }
}

impl fmt::Display for AuthorizationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let permissions: Vec<&str> = self.permissions.iter().map(Permission::name).collect();
        write!(
            f,
            "{} {} on {}({}) for {}",
            self.kind,
            permissions.join("|"),
            self.resource_type.name(),
            self.instance,
            self.principal
        )
    }
}
