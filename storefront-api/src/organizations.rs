//! User-scoped and organization-scoped endpoints
//!
//! Team management for organizations. The user id in the path stands for
//! the authenticated session identity; the organization id supplied by
//! the client is never trusted on its own: every organization-scoped
//! handler re-derives the caller's standing through the authorization
//! gate before touching state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_access::AccessError;
use storefront_org::{
    Organization, OrganizationInvitation, OrganizationMember, OrganizationSummary, Role,
};
use storefront_rbac::{Action, Module};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for issuing an invitation.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueInvitationRequest {
    /// Email address to invite.
    pub email: String,

    /// Role granted on acceptance.
    pub role_id: Uuid,
}

/// Request body for changing a member's role.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    /// The member's new role.
    pub role_id: Uuid,
}

async fn require(
    state: &AppState,
    user_id: Uuid,
    organization_id: Uuid,
    action: Action,
) -> ApiResult<()> {
    state
        .gate
        .authorize(user_id, organization_id, Module::Members, None, action)
        .await?
        .require()?;
    Ok(())
}

/// `GET /users/{user_id}/organizations`
pub async fn list_organizations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<OrganizationSummary>>> {
    let summaries = state.resolver.summaries(user_id).await?;
    Ok(Json(summaries))
}

/// `GET /users/{user_id}/organizations/default`
///
/// Resolves (and, if necessary, self-heals) the user's default
/// organization.
pub async fn default_organization(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Organization>> {
    let organization = state
        .resolver
        .default_organization(user_id)
        .await?
        .ok_or(AccessError::NotFound)?;
    Ok(Json(organization))
}

/// `PUT /users/{user_id}/organizations/{org_id}/default`
pub async fn set_default_organization(
    State(state): State<AppState>,
    Path((user_id, organization_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.resolver.set_default(user_id, organization_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/{user_id}/organizations/{org_id}/members`
pub async fn list_members(
    State(state): State<AppState>,
    Path((user_id, organization_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<OrganizationMember>>> {
    require(&state, user_id, organization_id, Action::View).await?;
    let members = state
        .memberships
        .members_of_organization(organization_id)
        .await
        .map_err(|err| ApiError::Access(AccessError::Storage(err.to_string())))?;
    Ok(Json(members))
}

/// `DELETE /users/{user_id}/organizations/{org_id}/members/{member_id}`
pub async fn remove_member(
    State(state): State<AppState>,
    Path((user_id, organization_id, member_user_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require(&state, user_id, organization_id, Action::Delete).await?;
    state
        .memberships
        .remove(organization_id, member_user_id)
        .await
        .map_err(|err| match err {
            storefront_access::AccessStoreError::NotFound => {
                ApiError::Access(AccessError::NotFound)
            }
            other => ApiError::Access(AccessError::Storage(other.to_string())),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /users/{user_id}/organizations/{org_id}/members/{member_id}/role`
pub async fn change_member_role(
    State(state): State<AppState>,
    Path((user_id, organization_id, member_user_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(request): Json<ChangeRoleRequest>,
) -> ApiResult<Json<OrganizationMember>> {
    require(&state, user_id, organization_id, Action::Edit).await?;
    let assignable = state
        .resolver
        .catalog()
        .role(request.role_id)
        .map(|role| role.is_assignable_in(organization_id))
        .unwrap_or(false);
    if !assignable {
        return Err(ApiError::Access(AccessError::RoleNotAssignable));
    }
    let member = state
        .memberships
        .set_role(organization_id, member_user_id, request.role_id)
        .await
        .map_err(|err| match err {
            storefront_access::AccessStoreError::NotFound => {
                ApiError::Access(AccessError::NotFound)
            }
            other => ApiError::Access(AccessError::Storage(other.to_string())),
        })?;
    Ok(Json(member))
}

/// `GET /users/{user_id}/organizations/{org_id}/roles`
///
/// Roles assignable within the organization; platform-wide roles never
/// appear here.
pub async fn assignable_roles(
    State(state): State<AppState>,
    Path((user_id, organization_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<Role>>> {
    require(&state, user_id, organization_id, Action::View).await?;
    let roles = state
        .resolver
        .catalog()
        .assignable_roles(organization_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(roles))
}

/// `GET /users/{user_id}/organizations/{org_id}/invitations`
pub async fn list_invitations(
    State(state): State<AppState>,
    Path((user_id, organization_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<OrganizationInvitation>>> {
    require(&state, user_id, organization_id, Action::View).await?;
    let invitations = state
        .invitations
        .pending_for_organization(organization_id)
        .await?;
    Ok(Json(invitations))
}

/// `POST /users/{user_id}/organizations/{org_id}/invitations`
pub async fn issue_invitation(
    State(state): State<AppState>,
    Path((user_id, organization_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<IssueInvitationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationInvitation>)> {
    require(&state, user_id, organization_id, Action::Create).await?;
    let invitation = state
        .invitations
        .issue(organization_id, &request.email, request.role_id, user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

/// `POST /users/{user_id}/organizations/{org_id}/invitations/{id}/resend`
pub async fn resend_invitation(
    State(state): State<AppState>,
    Path((user_id, organization_id, invitation_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Json<OrganizationInvitation>> {
    require(&state, user_id, organization_id, Action::Edit).await?;
    let invitation = state.invitations.resend(invitation_id).await?;
    Ok(Json(invitation))
}

/// `DELETE /users/{user_id}/organizations/{org_id}/invitations/{id}`
pub async fn cancel_invitation(
    State(state): State<AppState>,
    Path((user_id, organization_id, invitation_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require(&state, user_id, organization_id, Action::Delete).await?;
    state.invitations.cancel(invitation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
