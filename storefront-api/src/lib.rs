//! # Storefront API
//!
//! The HTTP surface of the jMarkets storefront platform. Three path
//! conventions are exposed:
//!
//! - **Public** (`/public/...`): unauthenticated availability checks and
//!   the invitation preview/accept pair
//! - **User-scoped** (`/users/{user_id}/...`): the caller's own
//!   organizations and default-organization selection
//! - **Organization-scoped** (`/users/{user_id}/organizations/{org_id}/...`):
//!   team management; every handler passes the authorization gate before
//!   touching state, so a client-supplied organization id is never
//!   trusted on its own
//!
//! `/routing/decision` resolves the request's `Host` header to the
//! storefront, the local store application, or the landing fallback.
//! An unmatched host is recovered locally, never surfaced as an error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storefront_api::{router, AppState};
//! # fn build_state() -> AppState { unimplemented!() }
//!
//! # async fn example() {
//! let state = build_state();
//! let app = router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod organizations;
pub mod public;
pub mod routing;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;

// Re-export main types for convenience
pub use error::{ApiError, ApiResult};
pub use public::{AcceptInvitationRequest, AvailabilityResponse};
pub use state::AppState;

/// Build the storefront API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/public/organizations/check-slug/{slug}",
            get(public::check_slug),
        )
        .route(
            "/public/organizations/check-subdomain/{subdomain}",
            get(public::check_subdomain),
        )
        .route(
            "/public/invitations/token/{token}",
            get(public::preview_invitation),
        )
        .route(
            "/public/invitations/accept/{token}",
            post(public::accept_invitation),
        )
        .route(
            "/users/{user_id}/organizations",
            get(organizations::list_organizations),
        )
        .route(
            "/users/{user_id}/organizations/default",
            get(organizations::default_organization),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/default",
            put(organizations::set_default_organization),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/members",
            get(organizations::list_members),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/members/{member_id}",
            delete(organizations::remove_member),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/members/{member_id}/role",
            put(organizations::change_member_role),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/roles",
            get(organizations::assignable_roles),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/invitations",
            get(organizations::list_invitations).post(organizations::issue_invitation),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/invitations/{invitation_id}/resend",
            post(organizations::resend_invitation),
        )
        .route(
            "/users/{user_id}/organizations/{org_id}/invitations/{invitation_id}",
            delete(organizations::cancel_invitation),
        )
        .route("/routing/decision", get(routing::route_decision))
        .with_state(state)
}
