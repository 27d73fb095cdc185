//! Membership and invitation storage
//!
//! Async seams between the access services and durable storage, plus
//! in-memory reference implementations. Every invariant with a
//! concurrency hazard (one membership per (organization, user), one
//! default per user, monotonic invitation status) is enforced here,
//! under a single write lock per operation in the in-memory versions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use storefront_org::{InvitationStatus, OrganizationInvitation, OrganizationMember};

/// Access storage error types.
#[derive(Debug, Error)]
pub enum AccessStoreError {
    /// No record matched the query.
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A compare-and-set observed a different current state.
    #[error("State conflict: record is '{current}'")]
    StateConflict {
        /// The state the record actually held.
        current: &'static str,
    },

    /// The backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for access storage operations.
pub type AccessStoreResult<T> = Result<T, AccessStoreError>;

/// Storage operations for organization memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// All memberships held by a user.
    async fn memberships_for_user(
        &self,
        user_id: Uuid,
    ) -> AccessStoreResult<Vec<OrganizationMember>>;

    /// All memberships of an organization.
    async fn members_of_organization(
        &self,
        organization_id: Uuid,
    ) -> AccessStoreResult<Vec<OrganizationMember>>;

    /// A user's membership in one organization, if any.
    async fn find(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AccessStoreResult<Option<OrganizationMember>>;

    /// Create a membership, enforcing one per (organization, user).
    async fn insert(&self, member: OrganizationMember) -> AccessStoreResult<()>;

    /// Remove a membership.
    async fn remove(&self, organization_id: Uuid, user_id: Uuid) -> AccessStoreResult<()>;

    /// Change a member's role.
    async fn set_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> AccessStoreResult<OrganizationMember>;

    /// Atomically clear the user's previous default flag and set the new
    /// one, in a single transaction.
    ///
    /// Fails with [`AccessStoreError::NotFound`] when the user has no
    /// membership in the target organization.
    async fn set_default(&self, user_id: Uuid, organization_id: Uuid) -> AccessStoreResult<()>;
}

/// Storage operations for organization invitations.
///
/// Invitations are resolved by status change and never deleted; the
/// status transition is a compare-and-set so concurrent resolutions have
/// exactly one winner.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Persist a new invitation.
    async fn insert(&self, invitation: OrganizationInvitation) -> AccessStoreResult<()>;

    /// Find an invitation by ID.
    async fn find_by_id(&self, id: Uuid) -> AccessStoreResult<Option<OrganizationInvitation>>;

    /// Find an invitation by its acceptance token.
    async fn find_by_token(
        &self,
        token: &str,
    ) -> AccessStoreResult<Option<OrganizationInvitation>>;

    /// Pending invitations of an organization.
    async fn pending_for_organization(
        &self,
        organization_id: Uuid,
    ) -> AccessStoreResult<Vec<OrganizationInvitation>>;

    /// Compare-and-set the status from `from` to `to`.
    ///
    /// Records the resolution timestamp and returns the updated
    /// invitation. Fails with [`AccessStoreError::StateConflict`] when the
    /// current status is not `from`; terminal statuses therefore never
    /// change again.
    async fn transition(
        &self,
        id: Uuid,
        from: InvitationStatus,
        to: InvitationStatus,
    ) -> AccessStoreResult<OrganizationInvitation>;

    /// Replace the token and extend the expiry of a pending invitation.
    ///
    /// Fails with [`AccessStoreError::StateConflict`] when the invitation
    /// is no longer pending.
    async fn refresh(&self, id: Uuid, token: &str)
        -> AccessStoreResult<OrganizationInvitation>;
}

/// Lookup of user accounts by email.
///
/// The platform's account service owns user records; the access layer
/// only needs to map an invited email to an existing account.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the account holding this email, if any (case-insensitive).
    async fn find_user_by_email(&self, email: &str) -> AccessStoreResult<Option<Uuid>>;
}

/// In-memory membership store.
#[derive(Default)]
pub struct MemoryMembershipStore {
    members: RwLock<HashMap<Uuid, OrganizationMember>>,
}

impl std::fmt::Debug for MemoryMembershipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryMembershipStore").finish()
    }
}

impl MemoryMembershipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn memberships_for_user(
        &self,
        user_id: Uuid,
    ) -> AccessStoreResult<Vec<OrganizationMember>> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn members_of_organization(
        &self,
        organization_id: Uuid,
    ) -> AccessStoreResult<Vec<OrganizationMember>> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AccessStoreResult<Option<OrganizationMember>> {
        let members = self.members.read().await;
        Ok(members
            .values()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, member: OrganizationMember) -> AccessStoreResult<()> {
        let mut members = self.members.write().await;
        if members
            .values()
            .any(|m| m.organization_id == member.organization_id && m.user_id == member.user_id)
        {
            return Err(AccessStoreError::Duplicate(
                "user is already a member of this organization".to_string(),
            ));
        }
        members.insert(member.id, member);
        Ok(())
    }

    async fn remove(&self, organization_id: Uuid, user_id: Uuid) -> AccessStoreResult<()> {
        let mut members = self.members.write().await;
        let id = members
            .values()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .map(|m| m.id)
            .ok_or(AccessStoreError::NotFound)?;
        members.remove(&id);
        Ok(())
    }

    async fn set_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> AccessStoreResult<OrganizationMember> {
        let mut members = self.members.write().await;
        let member = members
            .values_mut()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .ok_or(AccessStoreError::NotFound)?;
        member.set_role(role_id);
        Ok(member.clone())
    }

    async fn set_default(&self, user_id: Uuid, organization_id: Uuid) -> AccessStoreResult<()> {
        // One write guard covers the clear and the set, so concurrent
        // callers serialize and exactly one default survives.
        let mut members = self.members.write().await;
        if !members
            .values()
            .any(|m| m.organization_id == organization_id && m.user_id == user_id)
        {
            return Err(AccessStoreError::NotFound);
        }
        for member in members.values_mut().filter(|m| m.user_id == user_id) {
            member.is_default = member.organization_id == organization_id;
        }
        Ok(())
    }
}

/// In-memory invitation store.
#[derive(Default)]
pub struct MemoryInvitationStore {
    invitations: RwLock<HashMap<Uuid, OrganizationInvitation>>,
}

impl std::fmt::Debug for MemoryInvitationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryInvitationStore").finish()
    }
}

impl MemoryInvitationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvitationStore for MemoryInvitationStore {
    async fn insert(&self, invitation: OrganizationInvitation) -> AccessStoreResult<()> {
        let mut invitations = self.invitations.write().await;
        if invitations.values().any(|i| i.token == invitation.token) {
            return Err(AccessStoreError::Duplicate("token collision".to_string()));
        }
        invitations.insert(invitation.id, invitation);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AccessStoreResult<Option<OrganizationInvitation>> {
        Ok(self.invitations.read().await.get(&id).cloned())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> AccessStoreResult<Option<OrganizationInvitation>> {
        let invitations = self.invitations.read().await;
        Ok(invitations.values().find(|i| i.token == token).cloned())
    }

    async fn pending_for_organization(
        &self,
        organization_id: Uuid,
    ) -> AccessStoreResult<Vec<OrganizationInvitation>> {
        let invitations = self.invitations.read().await;
        Ok(invitations
            .values()
            .filter(|i| i.organization_id == organization_id && i.is_pending())
            .cloned()
            .collect())
    }

    async fn transition(
        &self,
        id: Uuid,
        from: InvitationStatus,
        to: InvitationStatus,
    ) -> AccessStoreResult<OrganizationInvitation> {
        let mut invitations = self.invitations.write().await;
        let invitation = invitations.get_mut(&id).ok_or(AccessStoreError::NotFound)?;
        // Terminal statuses never transition again, even when `from`
        // matches; only pending invitations move.
        if invitation.status != from || invitation.status.is_terminal() {
            return Err(AccessStoreError::StateConflict {
                current: invitation.status.as_str(),
            });
        }
        invitation.status = to;
        if to.is_terminal() {
            invitation.resolved_at = Some(Utc::now());
        }
        Ok(invitation.clone())
    }

    async fn refresh(
        &self,
        id: Uuid,
        token: &str,
    ) -> AccessStoreResult<OrganizationInvitation> {
        let mut invitations = self.invitations.write().await;
        let invitation = invitations.get_mut(&id).ok_or(AccessStoreError::NotFound)?;
        if !invitation.is_pending() {
            return Err(AccessStoreError::StateConflict {
                current: invitation.status.as_str(),
            });
        }
        invitation.refresh(token);
        Ok(invitation.clone())
    }
}

/// In-memory user directory.
#[derive(Default)]
pub struct MemoryUserDirectory {
    emails: RwLock<HashMap<Uuid, String>>,
}

impl std::fmt::Debug for MemoryUserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryUserDirectory").finish()
    }
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    pub async fn register(&self, user_id: Uuid, email: impl Into<String>) {
        self.emails
            .write()
            .await
            .insert(user_id, email.into().to_lowercase());
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> AccessStoreResult<Option<Uuid>> {
        let emails = self.emails.read().await;
        Ok(emails
            .iter()
            .find(|(_, e)| e.eq_ignore_ascii_case(email.trim()))
            .map(|(id, _)| *id))
    }
}
