//! Permission resolution
//!
//! A request is an OR over paths, a path an AND over permission triples.
//! Each triple is decided from the records matching its resource type,
//! instance (or `Any`) and the principal set, through the active revoke mode.

mod decision;
mod request;

pub use decision::{Decision, MissingAuthorization};
pub use request::{AuthorizationPath, AuthorizationRequest, PermissionTriple};

use std::sync::Arc;
use tracing::debug;

use crate::model::PrincipalSet;
use crate::revoke::{PermissionState, RevokeMode};
use crate::store::AuthorizationStore;

/// Stateless resolver over an authorization store
///
/// # Thread Safety
///
/// The resolver owns only an immutable revoke mode and a shared store handle,
/// so it can be shared across threads. Each call assumes the store presents a
/// consistent snapshot for its duration.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use procflow_authz::model::{Permission, Principal, PrincipalSet, ResourceInstance, ResourceType};
/// use procflow_authz::resolver::{AuthorizationPath, AuthorizationRequest, PermissionResolver, PermissionTriple};
/// use procflow_authz::revoke::RevokeMode;
/// use procflow_authz::store::{AuthorizationStore, InMemoryAuthorizationStore};
///
/// let store = Arc::new(InMemoryAuthorizationStore::new());
/// let resolver = PermissionResolver::new(store.clone(), RevokeMode::Always);
///
/// let t1 = ResourceInstance::id("t1").unwrap();
/// let request = AuthorizationRequest::new(vec![AuthorizationPath::single(
///     PermissionTriple::new(ResourceType::WorkItem, t1.clone(), Permission::Assign).unwrap(),
/// )])
/// .unwrap();
/// let principals = PrincipalSet::new("u1").unwrap();
///
/// assert!(!resolver.authorize(&principals, &request).authorized);
///
/// store
///     .grant(ResourceType::WorkItem, t1, Principal::user("u1").unwrap(), &[Permission::Assign])
///     .unwrap();
/// assert!(resolver.authorize(&principals, &request).authorized);
/// ```
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn AuthorizationStore>,
    mode: RevokeMode,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn AuthorizationStore>, mode: RevokeMode) -> Self {
        Self { store, mode }
    }

    pub fn mode(&self) -> RevokeMode {
        self.mode
    }

    /// Decides `request` for `principals`
    ///
    /// Paths are tried in order; the first one whose triples are all granted
    /// authorizes. When none does, the decision lists each path's primary
    /// triple.
    pub fn authorize(&self, principals: &PrincipalSet, request: &AuthorizationRequest) -> Decision {
        for (index, path) in request.paths().iter().enumerate() {
            if self.path_granted(principals, path) {
                debug!(
                    "Path {} {} granted for user '{}' (mode={})",
                    index,
                    path,
                    principals.user_id(),
                    self.mode
                );
                return Decision::allow(index);
            }
        }

        debug!(
            "No path granted for user '{}' across {} paths (mode={})",
            principals.user_id(),
            request.paths().len(),
            self.mode
        );

        let missing = request
            .paths()
            .iter()
            .map(|path| MissingAuthorization::from(path.primary()))
            .collect();

        Decision::deny(missing)
    }

    /// Effective state of a single triple for `principals`
    pub fn evaluate_triple(&self, principals: &PrincipalSet, triple: &PermissionTriple) -> PermissionState {
        let records = self
            .store
            .query(triple.resource_type, &triple.instance, principals);

        let state = self.mode.evaluate(&records, triple.permission, || {
            self.store.has_revokes(triple.resource_type, principals)
        });

        debug!(
            "Triple {} evaluated to {:?} from {} records",
            triple,
            state,
            records.len()
        );

        state
    }

    fn path_granted(&self, principals: &PrincipalSet, path: &AuthorizationPath) -> bool {
        path.triples()
            .iter()
            .all(|triple| self.evaluate_triple(principals, triple).is_granted())
    }
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("mode", &self.mode)
            .field("records", &self.store.len())
            .finish()
    }
}
