//! # Storefront Access
//!
//! Role-scoped authorization for the jMarkets storefront platform:
//! membership resolution, the authorization gate in front of every
//! organization-scoped mutation, and the invitation lifecycle that feeds
//! new memberships.
//!
//! ## Overview
//!
//! The storefront-access crate handles:
//! - **MembershipResolver**: Which organizations a user belongs to, with
//!   which role, and the self-healing default organization
//! - **AuthorizationGate**: "Can user U perform action A on (module,
//!   submodule) within organization O?"
//! - **InvitationLifecycle**: Issue, preview, accept, cancel, resend
//! - **Error taxonomy**: Reason-carrying failures with HTTP mappings
//!
//! ## Control flow
//!
//! ```text
//! request ─→ AuthorizationGate.authorize(user, org, module, submodule, action)
//!              ├─ MembershipResolver.membership  → none ⇒ Deny(not_a_member)
//!              └─ PermissionMatrix.has_permission → false ⇒ Deny(insufficient_permission)
//!                                                   true  ⇒ Allow
//! ```
//!
//! The gate is side-effect-free and safe to call speculatively as well as
//! authoritatively. Storage reads are bounded by a conservative timeout
//! and fail closed; timeouts surface as [`AccessError::StorageTimeout`]
//! so the caller can retry at a higher layer instead of the gate masking
//! the outcome.
//!
//! ## Concurrency guarantees
//!
//! - Invitation acceptance is a compare-and-set on the pending status:
//!   of two concurrent accepts exactly one wins, the loser observes
//!   [`AccessError::InvitationAlreadyResolved`].
//! - `set_default` clears and sets the flag in a single transaction, so
//!   at most one membership per user is ever the default.

pub mod error;
pub mod gate;
pub mod invitations;
pub mod membership;
pub mod store;

use std::future::Future;
use std::time::Duration;

// Re-export main types for convenience
pub use error::{AccessError, AccessResult};
pub use gate::{AuthorizationGate, Decision, DenyReason};
pub use invitations::{InvitationLifecycle, InvitationPreview};
pub use membership::MembershipResolver;
pub use store::{
    AccessStoreError, AccessStoreResult, InvitationStore, MembershipStore,
    MemoryInvitationStore, MemoryMembershipStore, MemoryUserDirectory, UserDirectory,
};

/// Default timeout for reads against durable storage.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(3);

/// Bound a storage future by the configured timeout, failing closed.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    future: impl Future<Output = T>,
) -> AccessResult<T> {
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| AccessError::StorageTimeout)
}
