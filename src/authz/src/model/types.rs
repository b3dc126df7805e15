//! Core resource and principal types

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthzError, Result};

/// Textual form of the wildcard resource instance
pub const ANY_INSTANCE: &str = "*";

/// Set of permissions carried by an authorization record
pub type PermissionSet = BTreeSet<Permission>;

/// Resource types known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// A unit of human-actionable work
    WorkItem,
    /// The reusable definition that spawns work items
    ProcessTemplate,
}

impl ResourceType {
    /// All resource types
    pub const ALL: [ResourceType; 2] = [ResourceType::WorkItem, ResourceType::ProcessTemplate];

    /// Stable identifier (e.g., `WORK_ITEM`)
    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::WorkItem => "WORK_ITEM",
            ResourceType::ProcessTemplate => "PROCESS_TEMPLATE",
        }
    }

    /// Human-readable name used in denial messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::WorkItem => "WorkItem",
            ResourceType::ProcessTemplate => "ProcessTemplate",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ResourceType {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceType::ALL
            .into_iter()
            .find(|rt| rt.name().eq_ignore_ascii_case(s) || rt.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AuthzError::UnknownName {
                kind: "resource type",
                name: s.to_string(),
            })
    }
}

/// Named capability on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Read,
    Update,
    Create,
    Delete,
    /// Reassign or otherwise manage a work item; accepted in place of `Update`
    Assign,
    /// Read every work item spawned by a process template
    ReadItems,
    /// Update every work item spawned by a process template
    UpdateItems,
    /// Umbrella permission covering every other permission
    All,
}

impl Permission {
    /// All permissions
    pub const ALL: [Permission; 8] = [
        Permission::Read,
        Permission::Update,
        Permission::Create,
        Permission::Delete,
        Permission::Assign,
        Permission::ReadItems,
        Permission::UpdateItems,
        Permission::All,
    ];

    /// Permission name as it appears in denial messages
    pub fn name(&self) -> &'static str {
        match self {
            Permission::Read => "READ",
            Permission::Update => "UPDATE",
            Permission::Create => "CREATE",
            Permission::Delete => "DELETE",
            Permission::Assign => "ASSIGN",
            Permission::ReadItems => "READ_ITEMS",
            Permission::UpdateItems => "UPDATE_ITEMS",
            Permission::All => "ALL",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Permission {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Permission::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AuthzError::UnknownName {
                kind: "permission",
                name: s.to_string(),
            })
    }
}

/// A concrete resource instance or the wildcard over every instance of a type
///
/// # Examples
///
/// ```
/// use procflow_authz::model::ResourceInstance;
///
/// let item = ResourceInstance::id("t1").unwrap();
/// assert!(ResourceInstance::Any.covers(&item));
/// assert!(!item.covers(&ResourceInstance::id("t2").unwrap()));
///
/// // the wildcard spelling can never name a concrete instance
/// assert!(ResourceInstance::id("*").is_err());
/// assert_eq!(ResourceInstance::parse("*").unwrap(), ResourceInstance::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceInstance {
    /// Every instance of the resource type
    Any,
    /// A single instance
    Id(String),
}

impl ResourceInstance {
    /// Creates a concrete instance reference
    ///
    /// # Errors
    ///
    /// Returns `EmptyInstanceId` for an empty id and `ReservedInstanceId`
    /// when the id is the wildcard spelling.
    pub fn id(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthzError::EmptyInstanceId);
        }
        if id == ANY_INSTANCE {
            return Err(AuthzError::ReservedInstanceId(id));
        }
        Ok(ResourceInstance::Id(id))
    }

    /// Parses the textual form, mapping `*` to `Any`
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw == ANY_INSTANCE {
            Ok(ResourceInstance::Any)
        } else {
            ResourceInstance::id(raw)
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, ResourceInstance::Any)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ResourceInstance::Any => ANY_INSTANCE,
            ResourceInstance::Id(id) => id,
        }
    }

    /// Whether a record scoped to `self` applies to a lookup for `queried`
    ///
    /// `Any` applies to everything; a concrete id only to itself. A lookup
    /// for `Any` is therefore only answered by `Any`-scoped records.
    pub fn covers(&self, queried: &ResourceInstance) -> bool {
        match self {
            ResourceInstance::Any => true,
            ResourceInstance::Id(_) => self == queried,
        }
    }
}

impl fmt::Display for ResourceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ResourceInstance {
    type Error = AuthzError;

    fn try_from(raw: String) -> Result<Self> {
        ResourceInstance::parse(raw)
    }
}

impl From<ResourceInstance> for String {
    fn from(instance: ResourceInstance) -> Self {
        match instance {
            ResourceInstance::Any => ANY_INSTANCE.to_string(),
            ResourceInstance::Id(id) => id,
        }
    }
}

/// User or group an authorization record is issued to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Principal {
    User(String),
    Group(String),
}

impl Principal {
    pub fn user(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthzError::EmptyPrincipalId);
        }
        Ok(Principal::User(id))
    }

    pub fn group(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthzError::EmptyPrincipalId);
        }
        Ok(Principal::Group(id))
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::User(id) | Principal::Group(id) => id,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::User(id) => write!(f, "user:{}", id),
            Principal::Group(id) => write!(f, "group:{}", id),
        }
    }
}

/// The acting user plus its groups, flattened once per request
///
/// The user is always the first member; groups follow in insertion order
/// with duplicates dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalSet {
    members: IndexSet<Principal>,
}

impl PrincipalSet {
    /// Creates a set containing only the acting user
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let mut members = IndexSet::new();
        members.insert(Principal::user(user_id)?);
        Ok(Self { members })
    }

    /// Adds a group membership
    pub fn with_group(mut self, group_id: impl Into<String>) -> Result<Self> {
        self.members.insert(Principal::group(group_id)?);
        Ok(self)
    }

    /// Adds several group memberships
    pub fn with_groups<I, S>(self, group_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        group_ids
            .into_iter()
            .try_fold(self, |set, group| set.with_group(group))
    }

    /// Identifier of the acting user
    pub fn user_id(&self) -> &str {
        self.members
            .first()
            .map(Principal::id)
            .unwrap_or_default()
    }

    /// Group identifiers, in insertion order
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().skip(1).map(Principal::id)
    }

    /// Every principal to look up, user first
    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
