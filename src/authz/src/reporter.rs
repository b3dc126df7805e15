//! Rendering deny decisions into structured failures

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::model::PrincipalSet;
use crate::resolver::{Decision, MissingAuthorization};

/// Structured access-denied failure
///
/// The rendered message names the user id and, for each missing
/// authorization, the permission name, resource instance and resource type
/// display name, so each can be located as an independent substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDenied {
    pub user_id: String,
    #[serde(default)]
    pub groups: Vec<String>,
    pub missing: Vec<MissingAuthorization>,
}

impl AuthorizationDenied {
    /// Human-readable message
    pub fn message(&self) -> String {
        match self.missing.as_slice() {
            [single] => format!(
                "The user with id '{}' does not have {}.",
                self.user_id,
                describe(single)
            ),
            missing => {
                let alternatives: Vec<String> = missing.iter().map(describe).collect();
                format!(
                    "The user with id '{}' does not have one of the following permissions: {}",
                    self.user_id,
                    alternatives.join(" or ")
                )
            }
        }
    }

    /// JSON form for callers that surface the failure over an API
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": "authorization_denied",
            "message": self.message(),
            "user_id": self.user_id,
            "groups": self.groups,
            "missing": self.missing,
        })
    }
}

fn describe(missing: &MissingAuthorization) -> String {
    format!(
        "'{}' permission on resource '{}' of type '{}'",
        missing.permission.name(),
        missing.resource_instance,
        missing.resource_type.display_name()
    )
}

impl fmt::Display for AuthorizationDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for AuthorizationDenied {}

/// Turns deny decisions into [`AuthorizationDenied`] failures
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionReporter;

impl DecisionReporter {
    pub fn new() -> Self {
        Self
    }

    /// Returns the failure for a deny decision, `None` when authorized
    pub fn report(&self, principals: &PrincipalSet, decision: &Decision) -> Option<AuthorizationDenied> {
        if decision.authorized {
            return None;
        }

        let denied = AuthorizationDenied {
            user_id: principals.user_id().to_string(),
            groups: principals.group_ids().map(str::to_string).collect(),
            missing: decision.missing.clone(),
        };

        info!("Authorization denied: {}", denied);
        Some(denied)
    }

    /// `Ok(())` when authorized, the failure otherwise
    pub fn check(&self, principals: &PrincipalSet, decision: &Decision) -> Result<(), AuthorizationDenied> {
        match self.report(principals, decision) {
            Some(denied) => Err(denied),
            None => Ok(()),
        }
    }
}
