//! In-memory authorization store backed by DashMap

use dashmap::DashMap;
use tracing::debug;

use super::record::AuthorizationRecord;
use super::AuthorizationStore;
use crate::model::{Principal, PrincipalSet, ResourceInstance, ResourceType};

/// Records for one (resource type, principal) pair
#[derive(Debug, Default, Clone)]
struct Bucket {
    records: Vec<AuthorizationRecord>,
    revokes: usize,
}

/// Thread-safe in-memory record index
///
/// Records are bucketed by `(resource type, principal)`; each bucket tracks
/// how many revoke records it holds so `has_revokes` never scans.
///
/// # Examples
///
/// ```
/// use procflow_authz::model::{Permission, Principal, PrincipalSet, ResourceInstance, ResourceType};
/// use procflow_authz::store::{AuthorizationStore, InMemoryAuthorizationStore};
///
/// let store = InMemoryAuthorizationStore::new();
/// store
///     .grant(
///         ResourceType::WorkItem,
///         ResourceInstance::Any,
///         Principal::user("u1").unwrap(),
///         &[Permission::Update],
///     )
///     .unwrap();
///
/// let principals = PrincipalSet::new("u1").unwrap();
/// let t1 = ResourceInstance::id("t1").unwrap();
/// assert_eq!(store.query(ResourceType::WorkItem, &t1, &principals).len(), 1);
/// assert!(!store.has_revokes(ResourceType::WorkItem, &principals));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationStore {
    buckets: DashMap<(ResourceType, Principal), Bucket>,
}

impl InMemoryAuthorizationStore {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Creates a store pre-populated with `records`
    pub fn with_records(records: impl IntoIterator<Item = AuthorizationRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }
}

impl AuthorizationStore for InMemoryAuthorizationStore {
    fn insert(&self, record: AuthorizationRecord) {
        debug!("Storing authorization record: {}", record);

        let key = (record.resource_type(), record.principal().clone());
        let mut bucket = self.buckets.entry(key).or_default();
        if record.is_revoke() {
            bucket.revokes += 1;
        }
        bucket.records.push(record);
    }

    fn delete(&self, record: &AuthorizationRecord) -> bool {
        let key = (record.resource_type(), record.principal().clone());
        let Some(mut bucket) = self.buckets.get_mut(&key) else {
            return false;
        };

        let Some(position) = bucket.records.iter().position(|r| r == record) else {
            return false;
        };

        let removed = bucket.records.remove(position);
        if removed.is_revoke() {
            bucket.revokes -= 1;
        }
        debug!("Deleted authorization record: {}", removed);
        true
    }

    fn query(
        &self,
        resource_type: ResourceType,
        instance: &ResourceInstance,
        principals: &PrincipalSet,
    ) -> Vec<AuthorizationRecord> {
        principals
            .iter()
            .filter_map(|principal| self.buckets.get(&(resource_type, principal.clone())))
            .flat_map(|bucket| {
                bucket
                    .records
                    .iter()
                    .filter(|record| record.applies_to(instance))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn has_revokes(&self, resource_type: ResourceType, principals: &PrincipalSet) -> bool {
        principals.iter().any(|principal| {
            self.buckets
                .get(&(resource_type, principal.clone()))
                .map_or(false, |bucket| bucket.revokes > 0)
        })
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.records.len()).sum()
    }

    fn clear(&self) {
        self.buckets.clear();
    }
}
