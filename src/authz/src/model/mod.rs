//! Resource model: resource types, permissions, instances and principals.
//!
//! This module provides the static vocabulary the rest of the engine speaks:
//! - Resource types (`WorkItem`, `ProcessTemplate`) and their valid permissions
//! - Implied alternatives (permissions that satisfy a requirement in place of another)
//! - Resource instances, including the `Any` wildcard
//! - Principals and per-request principal sets (user plus groups)

mod catalog;
mod types;

pub use catalog::ResourceModel;
pub use types::{
    Permission, PermissionSet, Principal, PrincipalSet, ResourceInstance, ResourceType,
    ANY_INSTANCE,
};
