//! Invitation domain models
//!
//! This module provides the invitation entity and its status lifecycle.
//! An invitation grants a named email a time-boxed, single-use right to
//! join an organization with a specified role. Invitations are resolved
//! by status change and never physically deleted while auditable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a freshly issued or resent invitation stays valid.
pub const INVITATION_VALIDITY_DAYS: i64 = 7;

/// Status of an organization invitation.
///
/// The lifecycle is `Pending → {Accepted, Cancelled, Expired}`; the three
/// resolved states are terminal. Transitions are enforced by the stores in
/// `storefront-access` with a compare-and-set on the pending status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting a decision from the invited email
    Pending,

    /// Accepted; a membership row exists
    Accepted,

    /// Withdrawn by an organization admin
    Cancelled,

    /// Expired before acceptance
    Expired,
}

impl InvitationStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Whether this status is terminal.
    ///
    /// Terminal statuses never transition again; in particular nothing
    /// moves back to `Pending`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// An invitation for an email address to join an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use storefront_org::{InvitationStatus, OrganizationInvitation};
///
/// let invitation = OrganizationInvitation::new(
///     Uuid::now_v7(),
///     "pat@example.com",
///     Uuid::now_v7(),
///     "token-abc",
///     Uuid::now_v7(),
/// );
/// assert_eq!(invitation.status, InvitationStatus::Pending);
/// assert!(invitation.is_pending());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationInvitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Organization the invitation joins
    pub organization_id: Uuid,

    /// Invited email address (stored lowercased)
    pub email: String,

    /// Role granted on acceptance
    pub role_id: Uuid,

    /// Single-use, unguessable acceptance token
    pub token: String,

    /// Member who issued the invitation
    pub invited_by: Uuid,

    /// Current lifecycle status
    pub status: InvitationStatus,

    /// When the invitation stops being acceptable
    pub expires_at: DateTime<Utc>,

    /// When the invitation was issued
    pub created_at: DateTime<Utc>,

    /// When the invitation left the pending state
    pub resolved_at: Option<DateTime<Utc>>,
}

impl OrganizationInvitation {
    /// Creates a new pending invitation with the standard validity window.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization being joined
    /// * `email` - The invited email (lowercased for comparison)
    /// * `role_id` - The role granted on acceptance
    /// * `token` - A random unguessable token minted by the caller
    /// * `invited_by` - The member issuing the invitation
    pub fn new(
        organization_id: Uuid,
        email: impl Into<String>,
        role_id: Uuid,
        token: impl Into<String>,
        invited_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            email: email.into().to_lowercase(),
            role_id,
            token: token.into(),
            invited_by,
            status: InvitationStatus::Pending,
            expires_at: now + Duration::days(INVITATION_VALIDITY_DAYS),
            created_at: now,
            resolved_at: None,
        }
    }

    /// Whether the invitation is still pending.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Whether the invitation's validity window has passed at `now`.
    ///
    /// A pending invitation past its window is still stored as `Pending`
    /// until an acceptance attempt observes the expiry and persists the
    /// `Expired` status.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether `email` matches the invited address (case-insensitive).
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Regenerate the token and extend the validity window.
    ///
    /// Legal only while pending; the lifecycle service guards the status
    /// before calling this.
    pub fn refresh(&mut self, token: impl Into<String>) {
        self.token = token.into();
        self.expires_at = Utc::now() + Duration::days(INVITATION_VALIDITY_DAYS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> OrganizationInvitation {
        OrganizationInvitation::new(
            Uuid::now_v7(),
            "Pat@Example.com",
            Uuid::now_v7(),
            "token-abc",
            Uuid::now_v7(),
        )
    }

    #[test]
    fn test_new_invitation_is_pending() {
        let inv = invitation();
        assert_eq!(inv.status, InvitationStatus::Pending);
        assert!(inv.is_pending());
        assert!(inv.resolved_at.is_none());
    }

    #[test]
    fn test_email_is_lowercased_and_matching_ignores_case() {
        let inv = invitation();
        assert_eq!(inv.email, "pat@example.com");
        assert!(inv.email_matches("PAT@example.COM"));
        assert!(inv.email_matches(" pat@example.com "));
        assert!(!inv.email_matches("other@example.com"));
    }

    #[test]
    fn test_expiry_window() {
        let inv = invitation();
        assert!(!inv.is_expired_at(Utc::now()));
        assert!(inv.is_expired_at(Utc::now() + Duration::days(INVITATION_VALIDITY_DAYS + 1)));
    }

    #[test]
    fn test_refresh_extends_window_and_rotates_token() {
        let mut inv = invitation();
        let old_expiry = inv.expires_at;

        inv.refresh("token-def");
        assert_eq!(inv.token, "token-def");
        assert!(inv.expires_at >= old_expiry);
        assert!(inv.is_pending());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Cancelled.is_terminal());
        assert!(InvitationStatus::Expired.is_terminal());
    }
}
