//! # Procflow Authorization
//!
//! Permission resolution for work item property mutations in the procflow
//! workflow engine.
//!
//! ## Features
//!
//! - **Resource model** with per-type permission vocabularies and implied alternatives
//! - **Concurrent authorization store** of grant and revoke records
//! - **Revoke policies** `ALWAYS` and `AUTO` with identical outcomes
//! - **Path resolution**: OR across alternative paths, AND within a path
//! - **Structured denials** naming every missing authorization
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use procflow_authz::{
//!     AuthorizationStore, CommandContext, EngineConfig, InMemoryAuthorizationStore,
//!     MutationGate, Permission, Principal, PropertyMutation, ResourceInstance,
//!     ResourceType, WorkItemRef,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryAuthorizationStore::new());
//! store.grant(
//!     ResourceType::WorkItem,
//!     ResourceInstance::id("t1")?,
//!     Principal::user("alice")?,
//!     &[Permission::Assign],
//! )?;
//!
//! let gate = MutationGate::new(store, &EngineConfig::default());
//! let item = WorkItemRef::standalone("t1")?;
//!
//! let decision = gate.check(&CommandContext::new("alice"), PropertyMutation::Priority, &item)?;
//! assert!(decision.authorized);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod reporter;
pub mod resolver;
pub mod revoke;
pub mod store;

// Re-export commonly used types
pub use config::{EngineConfig, LoggingConfig};
pub use error::{AuthzError, Result};
pub use gate::{required_request, CommandContext, MutationGate, PropertyMutation, WorkItemRef};
pub use metrics::{GateMetrics, MetricsSnapshot};
pub use model::{
    Permission, PermissionSet, Principal, PrincipalSet, ResourceInstance, ResourceModel,
    ResourceType, ANY_INSTANCE,
};
pub use reporter::{AuthorizationDenied, DecisionReporter};
pub use resolver::{
    AuthorizationPath, AuthorizationRequest, Decision, MissingAuthorization, PermissionResolver,
    PermissionTriple,
};
pub use revoke::{PermissionState, RevokeMode};
pub use store::{AuthorizationRecord, AuthorizationStore, InMemoryAuthorizationStore, RecordKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
