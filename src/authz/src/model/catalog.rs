//! Static permission catalog per resource type

use super::types::{Permission, PermissionSet, ResourceType};
use crate::error::{AuthzError, Result};

const WORK_ITEM_PERMISSIONS: &[Permission] = &[
    Permission::Read,
    Permission::Update,
    Permission::Create,
    Permission::Delete,
    Permission::Assign,
    Permission::All,
];

const PROCESS_TEMPLATE_PERMISSIONS: &[Permission] = &[
    Permission::Read,
    Permission::Update,
    Permission::Delete,
    Permission::ReadItems,
    Permission::UpdateItems,
    Permission::Assign,
    Permission::All,
];

/// Alternatives accepted in place of a base permission on the same resource type.
///
/// Listed in the order they are tried (and reported), ahead of the base.
const IMPLIED_ALTERNATIVES: &[(ResourceType, Permission, &[Permission])] = &[
    (ResourceType::WorkItem, Permission::Update, &[Permission::Assign]),
    (ResourceType::ProcessTemplate, Permission::UpdateItems, &[Permission::Assign]),
];

/// Read-only catalog of resource types and their permission vocabulary
///
/// # Examples
///
/// ```
/// use procflow_authz::model::{Permission, ResourceModel, ResourceType};
///
/// let model = ResourceModel::new();
/// assert_eq!(
///     model.implied_alternatives(ResourceType::WorkItem, Permission::Update),
///     &[Permission::Assign]
/// );
/// assert!(!model.is_valid(ResourceType::WorkItem, Permission::UpdateItems));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceModel;

impl ResourceModel {
    pub fn new() -> Self {
        Self
    }

    /// Permissions that may appear in records for `resource_type`
    pub fn valid_permissions(&self, resource_type: ResourceType) -> &'static [Permission] {
        match resource_type {
            ResourceType::WorkItem => WORK_ITEM_PERMISSIONS,
            ResourceType::ProcessTemplate => PROCESS_TEMPLATE_PERMISSIONS,
        }
    }

    pub fn is_valid(&self, resource_type: ResourceType, permission: Permission) -> bool {
        self.valid_permissions(resource_type).contains(&permission)
    }

    /// Permissions that satisfy a requirement for `permission` on `resource_type`
    /// as well as `permission` itself does. Holding either is sufficient.
    pub fn implied_alternatives(
        &self,
        resource_type: ResourceType,
        permission: Permission,
    ) -> &'static [Permission] {
        IMPLIED_ALTERNATIVES
            .iter()
            .find(|(rt, base, _)| *rt == resource_type && *base == permission)
            .map(|(_, _, alternatives)| *alternatives)
            .unwrap_or(&[])
    }

    /// Alternatives followed by the base permission, in evaluation order
    pub fn accepted_permissions(
        &self,
        resource_type: ResourceType,
        permission: Permission,
    ) -> Vec<Permission> {
        let mut accepted = self.implied_alternatives(resource_type, permission).to_vec();
        accepted.push(permission);
        accepted
    }

    /// Validates the permission set of a record for `resource_type`
    ///
    /// # Errors
    ///
    /// Returns `EmptyPermissionSet` for an empty set and `InvalidPermission`
    /// for the first permission outside the type's vocabulary.
    pub fn validate(&self, resource_type: ResourceType, permissions: &PermissionSet) -> Result<()> {
        if permissions.is_empty() {
            return Err(AuthzError::EmptyPermissionSet);
        }

        if let Some(permission) = permissions
            .iter()
            .find(|p| !self.is_valid(resource_type, **p))
        {
            return Err(AuthzError::InvalidPermission {
                permission: *permission,
                resource_type,
            });
        }

        Ok(())
    }
}
