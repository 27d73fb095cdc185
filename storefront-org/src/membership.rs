//! Membership domain models
//!
//! This module provides the membership entity linking users to
//! organizations. A membership carries the member's role and whether the
//! organization is the user's default landing context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization membership linking a user to an organization.
///
/// Invariants (enforced by the stores in `storefront-access`):
/// - at most one membership per `(organization_id, user_id)` pair
/// - at most one membership per user carries `is_default = true`
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use storefront_org::OrganizationMember;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let role_id = Uuid::now_v7();
/// let member = OrganizationMember::new(org_id, user_id, role_id);
/// assert!(!member.is_default);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// ID of the member's role
    pub role_id: Uuid,

    /// Whether this organization is the user's default landing context
    pub is_default: bool,

    /// Who invited this user (if joined by invitation)
    pub invited_by: Option<Uuid>,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl OrganizationMember {
    /// Creates a new organization membership.
    ///
    /// The membership is created with:
    /// - A newly generated UUID v7 ID
    /// - `is_default = false` (the resolver decides defaults)
    /// - Current timestamp for joined_at
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization ID
    /// * `user_id` - The user ID
    /// * `role_id` - The ID of the member's role
    pub fn new(organization_id: Uuid, user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role_id,
            is_default: false,
            invited_by: None,
            joined_at: Utc::now(),
        }
    }

    /// Set who invited this user.
    pub fn with_inviter(mut self, inviter_id: Uuid) -> Self {
        self.invited_by = Some(inviter_id);
        self
    }

    /// Mark this membership as the user's default.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Change the member's role.
    pub fn set_role(&mut self, role_id: Uuid) {
        self.role_id = role_id;
    }
}
