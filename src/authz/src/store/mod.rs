//! Authorization record storage
//!
//! The store is a pure index over grant/revoke records. It answers lookups by
//! resource type, instance and principal set, and holds no permission logic:
//! deciding what the records mean is the resolver's job.

mod memory;
mod record;

pub use memory::InMemoryAuthorizationStore;
pub use record::{AuthorizationRecord, RecordKind};

use crate::error::Result;
use crate::model::{Permission, Principal, PrincipalSet, ResourceInstance, ResourceType};

/// Authorization record store
///
/// Mutations are expected to run inside the host engine's transactional
/// command scope; lookups must observe a consistent snapshot for the
/// duration of one resolution.
pub trait AuthorizationStore: Send + Sync {
    /// Stores a record
    fn insert(&self, record: AuthorizationRecord);

    /// Deletes a record, returning whether it was present
    fn delete(&self, record: &AuthorizationRecord) -> bool;

    /// Returns every record for any principal in `principals` whose scope is
    /// `instance` or `Any`
    fn query(
        &self,
        resource_type: ResourceType,
        instance: &ResourceInstance,
        principals: &PrincipalSet,
    ) -> Vec<AuthorizationRecord>;

    /// Whether any revoke record exists for `resource_type` and any principal
    /// in `principals`, regardless of instance
    fn has_revokes(&self, resource_type: ResourceType, principals: &PrincipalSet) -> bool;

    /// Total number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every record
    fn clear(&self);

    /// Validates and stores a grant record
    fn grant(
        &self,
        resource_type: ResourceType,
        instance: ResourceInstance,
        principal: Principal,
        permissions: &[Permission],
    ) -> Result<AuthorizationRecord> {
        let record = AuthorizationRecord::grant(
            resource_type,
            instance,
            principal,
            permissions.iter().copied(),
        )?;
        self.insert(record.clone());
        Ok(record)
    }

    /// Validates and stores a revoke record
    fn revoke(
        &self,
        resource_type: ResourceType,
        instance: ResourceInstance,
        principal: Principal,
        permissions: &[Permission],
    ) -> Result<AuthorizationRecord> {
        let record = AuthorizationRecord::revoke(
            resource_type,
            instance,
            principal,
            permissions.iter().copied(),
        )?;
        self.insert(record.clone());
        Ok(record)
    }
}
