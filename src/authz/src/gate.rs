//! Authorization gate for work item property mutations
//!
//! Maps each mutation kind to its base permission requirements through a data
//! table, expands every requirement with its implied alternatives, and asks
//! the resolver whether the acting principal holds any of the resulting paths.
//!
//! ```text
//! CommandContext ─► PrincipalSet ─┐
//! PropertyMutation ─► requirements ─► AuthorizationRequest ─► PermissionResolver ─► Decision
//! WorkItemRef ────────────────────┘                                                   │
//!                                                          DecisionReporter ◄─ deny ──┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{AuthzError, Result};
use crate::metrics::{GateMetrics, MetricsSnapshot};
use crate::model::{Permission, PrincipalSet, ResourceInstance, ResourceModel, ResourceType};
use crate::reporter::DecisionReporter;
use crate::resolver::{AuthorizationPath, AuthorizationRequest, Decision, PermissionResolver, PermissionTriple};
use crate::store::AuthorizationStore;

/// Mutable work item properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyMutation {
    Priority,
    Name,
    Description,
    DueDate,
    FollowUpDate,
}

impl PropertyMutation {
    pub const ALL: [PropertyMutation; 5] = [
        PropertyMutation::Priority,
        PropertyMutation::Name,
        PropertyMutation::Description,
        PropertyMutation::DueDate,
        PropertyMutation::FollowUpDate,
    ];

    /// Name of the host operation performing the mutation
    pub fn operation_name(&self) -> &'static str {
        match self {
            PropertyMutation::Priority => "setPriority",
            PropertyMutation::Name => "setName",
            PropertyMutation::Description => "setDescription",
            PropertyMutation::DueDate => "setDueDate",
            PropertyMutation::FollowUpDate => "setFollowUpDate",
        }
    }

    /// Base requirements from [`MUTATION_REQUIREMENTS`]
    pub fn requirements(&self) -> &'static [Requirement] {
        MUTATION_REQUIREMENTS
            .iter()
            .find(|(mutation, _)| mutation == self)
            .map(|(_, requirements)| *requirements)
            .unwrap_or(&[])
    }
}

impl fmt::Display for PropertyMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}

/// Which resource a requirement is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementScope {
    /// The work item itself
    Item,
    /// The process template that spawned the work item; skipped for standalone items
    OwningTemplate,
}

impl RequirementScope {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            RequirementScope::Item => ResourceType::WorkItem,
            RequirementScope::OwningTemplate => ResourceType::ProcessTemplate,
        }
    }
}

/// A base permission required on a scope, before alternatives are added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub scope: RequirementScope,
    pub permission: Permission,
}

const PROPERTY_UPDATE: &[Requirement] = &[
    Requirement {
        scope: RequirementScope::Item,
        permission: Permission::Update,
    },
    Requirement {
        scope: RequirementScope::OwningTemplate,
        permission: Permission::UpdateItems,
    },
];

/// Base requirements per mutation kind
pub const MUTATION_REQUIREMENTS: &[(PropertyMutation, &[Requirement])] = &[
    (PropertyMutation::Priority, PROPERTY_UPDATE),
    (PropertyMutation::Name, PROPERTY_UPDATE),
    (PropertyMutation::Description, PROPERTY_UPDATE),
    (PropertyMutation::DueDate, PROPERTY_UPDATE),
    (PropertyMutation::FollowUpDate, PROPERTY_UPDATE),
];

/// The work item targeted by a mutation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItemRef {
    id: ResourceInstance,
    template_key: Option<ResourceInstance>,
}

impl WorkItemRef {
    /// A work item created outside any process instance
    pub fn standalone(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: ResourceInstance::id(id)?,
            template_key: None,
        })
    }

    /// A work item spawned by an instance of the template `template_key`
    pub fn spawned_by(id: impl Into<String>, template_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: ResourceInstance::id(id)?,
            template_key: Some(ResourceInstance::id(template_key)?),
        })
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn template_key(&self) -> Option<&str> {
        self.template_key.as_ref().map(ResourceInstance::as_str)
    }

    fn instance_for(&self, scope: RequirementScope) -> Option<&ResourceInstance> {
        match scope {
            RequirementScope::Item => Some(&self.id),
            RequirementScope::OwningTemplate => self.template_key.as_ref(),
        }
    }
}

/// Acting user and group memberships of the current command
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandContext {
    pub user_id: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl CommandContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Flattens the user and its groups into the lookup set
    pub fn principals(&self) -> Result<PrincipalSet> {
        PrincipalSet::new(self.user_id.clone())?.with_groups(self.groups.iter().cloned())
    }
}

/// Builds the request for `mutation` on `item`
///
/// Every base requirement turns into one single-triple path per accepted
/// permission, alternatives first. Template-scoped requirements are dropped
/// for standalone items.
pub fn required_request(
    model: &ResourceModel,
    mutation: PropertyMutation,
    item: &WorkItemRef,
) -> Result<AuthorizationRequest> {
    let mut paths = Vec::new();

    for requirement in mutation.requirements() {
        let Some(instance) = item.instance_for(requirement.scope) else {
            continue;
        };
        let resource_type = requirement.scope.resource_type();

        for permission in model.accepted_permissions(resource_type, requirement.permission) {
            paths.push(AuthorizationPath::single(PermissionTriple::new(
                resource_type,
                instance.clone(),
                permission,
            )?));
        }
    }

    AuthorizationRequest::new(paths)
}

/// Permission gate in front of work item property mutations
pub struct MutationGate {
    resolver: PermissionResolver,
    reporter: DecisionReporter,
    model: ResourceModel,
    enabled: bool,
    metrics: GateMetrics,
}

impl MutationGate {
    pub fn new(store: Arc<dyn AuthorizationStore>, config: &EngineConfig) -> Self {
        if !config.authorization_enabled() {
            warn!("Authorization checks are disabled; every mutation will be permitted");
        }

        Self {
            resolver: PermissionResolver::new(store, config.revoke_mode()),
            reporter: DecisionReporter::new(),
            model: ResourceModel::new(),
            enabled: config.authorization_enabled(),
            metrics: GateMetrics::new(),
        }
    }

    /// Decides whether the command's user may perform `mutation` on `item`
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::Denied` carrying the missing authorizations when
    /// no acceptable path is held, or a contract error for malformed input.
    pub fn check(
        &self,
        context: &CommandContext,
        mutation: PropertyMutation,
        item: &WorkItemRef,
    ) -> Result<Decision> {
        if !self.enabled {
            debug!("Authorization disabled, permitting {} on '{}'", mutation, item.id());
            self.metrics.record_bypass();
            return Ok(Decision::bypass());
        }

        let principals = context.principals()?;
        let request = required_request(&self.model, mutation, item)?;

        debug!(
            "Checking {} on work item '{}' (template={:?}) for user '{}' with {} paths",
            mutation,
            item.id(),
            item.template_key(),
            principals.user_id(),
            request.paths().len()
        );

        let decision = self.resolver.authorize(&principals, &request);
        self.metrics.record_decision(decision.authorized);

        self.reporter
            .check(&principals, &decision)
            .map_err(AuthzError::Denied)?;

        Ok(decision)
    }

    /// Runs `operation` only when [`check`](Self::check) authorizes it
    pub fn apply<T, F>(
        &self,
        context: &CommandContext,
        mutation: PropertyMutation,
        item: &WorkItemRef,
        operation: F,
    ) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.check(context, mutation, item)?;
        Ok(operation())
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
