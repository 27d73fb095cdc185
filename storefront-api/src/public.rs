//! Public, unauthenticated endpoints
//!
//! Availability checks for signup forms and the invitation preview/accept
//! pair. Availability responses are bare booleans; the reserved-word list
//! stays server-side.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_access::InvitationPreview;
use storefront_org::OrganizationMember;

use crate::error::ApiResult;
use crate::state::AppState;

/// Response body for availability checks.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the name can still be claimed.
    pub available: bool,
}

/// Request body for accepting an invitation.
///
/// The user id and email come from the authenticated session of the
/// accepting account; the email is compared against the invitation's
/// target address.
#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptInvitationRequest {
    /// The accepting account.
    pub user_id: Uuid,

    /// The accepting account's email.
    pub email: String,
}

/// `GET /public/organizations/check-slug/{slug}`
pub async fn check_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Json<AvailabilityResponse> {
    let available = state.directory.is_slug_available(&slug).await;
    Json(AvailabilityResponse { available })
}

/// `GET /public/organizations/check-subdomain/{subdomain}`
pub async fn check_subdomain(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Json<AvailabilityResponse> {
    let available = state.directory.is_subdomain_available(&subdomain).await;
    Json(AvailabilityResponse { available })
}

/// `GET /public/invitations/token/{token}`
///
/// Read-only preview, safe for pre-login display; never transitions the
/// invitation.
pub async fn preview_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<InvitationPreview>> {
    let preview = state.invitations.preview(&token).await?;
    Ok(Json(preview))
}

/// `POST /public/invitations/accept/{token}`
pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<AcceptInvitationRequest>,
) -> ApiResult<Json<OrganizationMember>> {
    let member = state
        .invitations
        .accept(&token, request.user_id, &request.email)
        .await?;
    Ok(Json(member))
}
