//! Revoke evaluation strategies
//!
//! Both strategies decide whether one permission is effectively granted given
//! the records matching a single (resource type, instance, principal set)
//! lookup. They must agree on every input; `Auto` only skips work when it
//! already knows no revoke record can be involved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthzError, Result};
use crate::model::Permission;
use crate::store::AuthorizationRecord;

/// Process-wide revoke evaluation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevokeMode {
    /// Scan every matching record for revokes
    Always,
    /// Skip the revoke scan when no revoke record exists for the lookup
    #[default]
    Auto,
}

/// Effective state of one permission after evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionState {
    /// A grant covers the permission and no revoke does
    Granted,
    /// No grant covers the permission
    Missing,
    /// A revoke covers the permission
    Revoked,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

impl RevokeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevokeMode::Always => "always",
            RevokeMode::Auto => "auto",
        }
    }

    /// Evaluates `permission` against `records` under this mode
    ///
    /// `revokes_present` is only consulted in `Auto` mode; it must return
    /// true whenever any record in `records` is a revoke.
    pub fn evaluate<F>(
        &self,
        records: &[AuthorizationRecord],
        permission: Permission,
        revokes_present: F,
    ) -> PermissionState
    where
        F: FnOnce() -> bool,
    {
        match self {
            RevokeMode::Always => evaluate_always(records, permission),
            RevokeMode::Auto => evaluate_auto(records, permission, revokes_present()),
        }
    }
}

impl fmt::Display for RevokeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevokeMode {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(RevokeMode::Always),
            "auto" => Ok(RevokeMode::Auto),
            other => Err(AuthzError::Config(format!(
                "unknown revoke mode '{}' (expected 'always' or 'auto')",
                other
            ))),
        }
    }
}

/// Exhaustive evaluation: every record is inspected
///
/// A covering revoke wins over any covering grant, whatever the scope of
/// either record.
pub fn evaluate_always(records: &[AuthorizationRecord], permission: Permission) -> PermissionState {
    let mut granted = false;
    let mut revoked = false;

    for record in records.iter().filter(|r| r.covers(permission)) {
        if record.is_revoke() {
            revoked = true;
        } else {
            granted = true;
        }
    }

    if revoked {
        PermissionState::Revoked
    } else if granted {
        PermissionState::Granted
    } else {
        PermissionState::Missing
    }
}

/// Short-circuiting evaluation
///
/// Without revokes the first covering grant decides; otherwise falls back to
/// [`evaluate_always`].
pub fn evaluate_auto(
    records: &[AuthorizationRecord],
    permission: Permission,
    revokes_present: bool,
) -> PermissionState {
    if revokes_present {
        return evaluate_always(records, permission);
    }

    if records.iter().any(|r| r.is_grant() && r.covers(permission)) {
        PermissionState::Granted
    } else {
        PermissionState::Missing
    }
}
