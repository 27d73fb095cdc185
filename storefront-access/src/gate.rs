//! Authorization gate
//!
//! The single mandatory check in front of every state-mutating operation
//! scoped to an organization. Combines membership resolution with the
//! permission matrix; side-effect-free, so it is equally safe to call
//! speculatively (to decide whether to render an affordance) and
//! authoritatively (immediately before a mutation).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use storefront_rbac::{Action, Module, PermissionMatrix, Submodule};

use crate::error::{AccessError, AccessResult};
use crate::membership::MembershipResolver;

/// Why an authorization request was denied.
///
/// The reason kind is surfaced to the caller; nothing about whether the
/// organization or its resources exist ever is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The user has no membership in the organization.
    NotAMember,

    /// The member's role does not grant the action.
    InsufficientPermission,
}

/// Outcome of an authorization request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    /// The operation is permitted.
    Allow,

    /// The operation is denied for the given reason.
    Deny(DenyReason),
}

impl Decision {
    /// Whether the operation is permitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert a denial into the matching [`AccessError`].
    ///
    /// Convenient for handlers that gate a mutation with `?`.
    pub fn require(self) -> AccessResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotAMember) => Err(AccessError::NotAMember),
            Decision::Deny(DenyReason::InsufficientPermission) => {
                Err(AccessError::InsufficientPermission)
            }
        }
    }
}

/// Decides whether a user may perform an action within an organization.
pub struct AuthorizationGate {
    resolver: Arc<MembershipResolver>,
    matrix: Arc<PermissionMatrix>,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish()
    }
}

impl AuthorizationGate {
    /// Create a gate over a membership resolver and a permission matrix.
    pub fn new(resolver: Arc<MembershipResolver>, matrix: Arc<PermissionMatrix>) -> Self {
        Self { resolver, matrix }
    }

    /// Can `user_id` perform `action` on `(module, submodule)` within
    /// `organization_id`?
    ///
    /// 1. No membership ⇒ `Deny(NotAMember)`.
    /// 2. Membership whose role lacks the permission ⇒
    ///    `Deny(InsufficientPermission)`.
    /// 3. Otherwise `Allow`.
    ///
    /// Storage timeouts fail closed as an error rather than a decision so
    /// the caller can distinguish an outage from a denial; the gate never
    /// retries internally.
    #[instrument(skip(self))]
    pub async fn authorize(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        module: Module,
        submodule: Option<Submodule>,
        action: Action,
    ) -> AccessResult<Decision> {
        let Some(membership) = self.resolver.membership(user_id, organization_id).await? else {
            debug!(user = %user_id, organization = %organization_id, "Deny: not a member");
            return Ok(Decision::Deny(DenyReason::NotAMember));
        };

        if !self
            .matrix
            .has_permission(membership.role_id, module, submodule, action)
        {
            debug!(
                user = %user_id,
                organization = %organization_id,
                module = module.as_str(),
                action = action.as_str(),
                "Deny: insufficient permission"
            );
            return Ok(Decision::Deny(DenyReason::InsufficientPermission));
        }

        Ok(Decision::Allow)
    }
}
