//! Invitation lifecycle
//!
//! Issues, previews, accepts, cancels, and resends organization
//! invitations. Acceptance is a compare-and-set on the pending status, so
//! two concurrent accepts for the same token have exactly one winner; the
//! loser observes `InvitationAlreadyResolved`.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use storefront_org::{
    InvitationStatus, OrganizationInvitation, OrganizationMember, RoleCatalog,
};
use storefront_tenancy::TenantStore;

use crate::error::{AccessError, AccessResult};
use crate::store::{AccessStoreError, InvitationStore, MembershipStore, UserDirectory};
use crate::{bounded, DEFAULT_STORAGE_TIMEOUT};

/// Read-only view of an invitation, safe for unauthenticated pre-login
/// display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationPreview {
    /// Invitation ID
    pub id: Uuid,

    /// Organization being joined
    pub organization_id: Uuid,

    /// Organization display name
    pub organization_name: String,

    /// Invited email
    pub email: String,

    /// Display name of the role granted on acceptance
    pub role_name: String,

    /// Current status
    pub status: InvitationStatus,

    /// When the invitation stops being acceptable
    pub expires_at: DateTime<Utc>,

    /// Whether the validity window has already passed.
    ///
    /// Computed at read time; the preview never transitions the status.
    pub expired: bool,
}

/// Manages pending invitations for organizations.
pub struct InvitationLifecycle {
    invitations: Arc<dyn InvitationStore>,
    memberships: Arc<dyn MembershipStore>,
    users: Arc<dyn UserDirectory>,
    tenants: Arc<dyn TenantStore>,
    catalog: Arc<RoleCatalog>,
    storage_timeout: Duration,
}

impl std::fmt::Debug for InvitationLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationLifecycle")
            .field("storage_timeout", &self.storage_timeout)
            .finish()
    }
}

impl InvitationLifecycle {
    /// Create a lifecycle service over the given stores.
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        memberships: Arc<dyn MembershipStore>,
        users: Arc<dyn UserDirectory>,
        tenants: Arc<dyn TenantStore>,
        catalog: Arc<RoleCatalog>,
    ) -> Self {
        Self {
            invitations,
            memberships,
            users,
            tenants,
            catalog,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Override the storage read timeout.
    pub fn with_storage_timeout(mut self, storage_timeout: Duration) -> Self {
        self.storage_timeout = storage_timeout;
        self
    }

    /// Issue a pending invitation.
    ///
    /// Fails with [`AccessError::RoleNotAssignable`] when the role is
    /// platform-wide or owned by another organization, and with
    /// [`AccessError::AlreadyMember`] when the email already belongs to a
    /// member of the organization.
    #[instrument(skip(self, email), fields(organization = %organization_id))]
    pub async fn issue(
        &self,
        organization_id: Uuid,
        email: &str,
        role_id: Uuid,
        invited_by: Uuid,
    ) -> AccessResult<OrganizationInvitation> {
        let assignable = self
            .catalog
            .role(role_id)
            .map(|role| role.is_assignable_in(organization_id))
            .unwrap_or(false);
        if !assignable {
            return Err(AccessError::RoleNotAssignable);
        }

        if let Some(user_id) = bounded(self.storage_timeout, self.users.find_user_by_email(email))
            .await?
            .map_err(storage_error)?
        {
            let existing = bounded(
                self.storage_timeout,
                self.memberships.find(organization_id, user_id),
            )
            .await?
            .map_err(storage_error)?;
            if existing.is_some() {
                return Err(AccessError::AlreadyMember);
            }
        }

        let invitation =
            OrganizationInvitation::new(organization_id, email, role_id, mint_token(), invited_by);
        bounded(self.storage_timeout, self.invitations.insert(invitation.clone()))
            .await?
            .map_err(storage_error)?;
        debug!(invitation = %invitation.id, "Invitation issued");
        Ok(invitation)
    }

    /// Read-only invitation lookup by token for pre-login display.
    #[instrument(skip(self, token))]
    pub async fn preview(&self, token: &str) -> AccessResult<InvitationPreview> {
        let invitation = self.find_by_token(token).await?;

        let organization_name = bounded(
            self.storage_timeout,
            self.tenants.find_by_id(invitation.organization_id),
        )
        .await?
        .map_err(|err| AccessError::Storage(err.to_string()))?
        .map(|org| org.name)
        .ok_or(AccessError::NotFound)?;

        let role_name = self
            .catalog
            .role(invitation.role_id)
            .map(|role| role.display_name.clone())
            .unwrap_or_else(|| "Member".to_string());

        Ok(InvitationPreview {
            id: invitation.id,
            organization_id: invitation.organization_id,
            organization_name,
            email: invitation.email.clone(),
            role_name,
            status: invitation.status,
            expires_at: invitation.expires_at,
            expired: invitation.is_expired_at(Utc::now()),
        })
    }

    /// Accept an invitation.
    ///
    /// Order of checks:
    /// 1. a resolved invitation fails with `InvitationAlreadyResolved`;
    /// 2. a pending invitation past its window is persisted as `Expired`
    ///    and the call fails with `InvitationExpired`;
    /// 3. an account email that does not match the invited email is a
    ///    hard failure, leaving the invitation pending;
    /// 4. the pending→accepted compare-and-set decides between
    ///    concurrent accepts, then the membership row is created. The
    ///    first membership a user gains becomes their default.
    #[instrument(skip(self, token, user_email), fields(user = %user_id))]
    pub async fn accept(
        &self,
        token: &str,
        user_id: Uuid,
        user_email: &str,
    ) -> AccessResult<OrganizationMember> {
        let invitation = self.find_by_token(token).await?;

        if !invitation.is_pending() {
            return Err(AccessError::InvitationAlreadyResolved);
        }

        if invitation.is_expired_at(Utc::now()) {
            if let Err(err) = self
                .transition(invitation.id, InvitationStatus::Pending, InvitationStatus::Expired)
                .await
            {
                // A concurrent caller may have resolved it first; the
                // expiry answer stands either way.
                warn!(invitation = %invitation.id, error = %err, "Expiry transition lost");
            }
            return Err(AccessError::InvitationExpired);
        }

        if !invitation.email_matches(user_email) {
            return Err(AccessError::InvitationEmailMismatch);
        }

        let existing = bounded(
            self.storage_timeout,
            self.memberships.find(invitation.organization_id, user_id),
        )
        .await?
        .map_err(storage_error)?;
        if existing.is_some() {
            return Err(AccessError::AlreadyMember);
        }

        // The CAS is the serialization point between concurrent accepts.
        bounded(
            self.storage_timeout,
            self.invitations.transition(
                invitation.id,
                InvitationStatus::Pending,
                InvitationStatus::Accepted,
            ),
        )
        .await?
        .map_err(|err| match err {
            AccessStoreError::StateConflict { .. } => AccessError::InvitationAlreadyResolved,
            other => storage_error(other),
        })?;

        let is_first_membership = bounded(
            self.storage_timeout,
            self.memberships.memberships_for_user(user_id),
        )
        .await?
        .map_err(storage_error)?
        .is_empty();

        let mut member =
            OrganizationMember::new(invitation.organization_id, user_id, invitation.role_id)
                .with_inviter(invitation.invited_by);
        if is_first_membership {
            member = member.as_default();
        }

        bounded(self.storage_timeout, self.memberships.insert(member.clone()))
            .await?
            .map_err(|err| match err {
                AccessStoreError::Duplicate(_) => AccessError::AlreadyMember,
                other => storage_error(other),
            })?;

        debug!(
            invitation = %invitation.id,
            organization = %invitation.organization_id,
            "Invitation accepted"
        );
        Ok(member)
    }

    /// Cancel a pending invitation.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> AccessResult<()> {
        self.transition(id, InvitationStatus::Pending, InvitationStatus::Cancelled)
            .await?;
        debug!(invitation = %id, "Invitation cancelled");
        Ok(())
    }

    /// Regenerate the token and extend the expiry of a pending
    /// invitation; the status does not change.
    #[instrument(skip(self))]
    pub async fn resend(&self, id: Uuid) -> AccessResult<OrganizationInvitation> {
        let refreshed = bounded(self.storage_timeout, self.invitations.refresh(id, &mint_token()))
            .await?
            .map_err(|err| match err {
                AccessStoreError::StateConflict { .. } => AccessError::InvitationAlreadyResolved,
                other => storage_error(other),
            })?;
        debug!(invitation = %id, "Invitation resent");
        Ok(refreshed)
    }

    /// Pending invitations of an organization, for team-management views.
    pub async fn pending_for_organization(
        &self,
        organization_id: Uuid,
    ) -> AccessResult<Vec<OrganizationInvitation>> {
        bounded(
            self.storage_timeout,
            self.invitations.pending_for_organization(organization_id),
        )
        .await?
        .map_err(storage_error)
    }

    async fn find_by_token(&self, token: &str) -> AccessResult<OrganizationInvitation> {
        bounded(self.storage_timeout, self.invitations.find_by_token(token))
            .await?
            .map_err(storage_error)?
            .ok_or(AccessError::NotFound)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: InvitationStatus,
        to: InvitationStatus,
    ) -> AccessResult<OrganizationInvitation> {
        bounded(self.storage_timeout, self.invitations.transition(id, from, to))
            .await?
            .map_err(|err| match err {
                AccessStoreError::StateConflict { .. } => AccessError::InvitationAlreadyResolved,
                other => storage_error(other),
            })
    }
}

/// Mint a 256-bit URL-safe invitation token.
fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn storage_error(err: AccessStoreError) -> AccessError {
    match err {
        AccessStoreError::NotFound => AccessError::NotFound,
        other => AccessError::Storage(other.to_string()),
    }
}
