//! Error types for access operations
//!
//! This module defines the error taxonomy surfaced by membership
//! resolution, the authorization gate, and the invitation lifecycle.
//! Authorization failures carry a reason kind but never details about
//! whether a resource exists in another tenant.

use thiserror::Error;

/// Access error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The user has no membership in the organization.
    #[error("Not a member of this organization")]
    NotAMember,

    /// The member's role does not grant the requested action.
    #[error("Insufficient permission for this action")]
    InsufficientPermission,

    /// The invitation's validity window has passed.
    #[error("Invitation has expired")]
    InvitationExpired,

    /// The invitation was already accepted, cancelled, or expired.
    #[error("Invitation has already been resolved")]
    InvitationAlreadyResolved,

    /// The accepting account's email does not match the invited email.
    #[error("Account email does not match the invitation")]
    InvitationEmailMismatch,

    /// The invited email already belongs to an active member.
    #[error("Email is already a member of this organization")]
    AlreadyMember,

    /// The role is platform-wide or owned by another organization.
    #[error("Role is not assignable in this organization")]
    RoleNotAssignable,

    /// The requested slug or subdomain is reserved or already held.
    #[error("Slug or subdomain is taken")]
    SlugOrSubdomainTaken,

    /// A storage read or write exceeded the configured timeout.
    ///
    /// Failed closed; retried by the caller at a higher layer, never
    /// silently inside the gate.
    #[error("Storage timed out")]
    StorageTimeout,

    /// The record does not exist.
    #[error("Not found")]
    NotFound,

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for access operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error should be logged at error level.
    ///
    /// Authorization and invitation-state failures are expected outcomes
    /// and should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AccessError::Storage(_) | AccessError::StorageTimeout)
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::NotAMember | AccessError::InsufficientPermission => 403,
            AccessError::InvitationExpired => 410,
            AccessError::InvitationAlreadyResolved
            | AccessError::InvitationEmailMismatch
            | AccessError::AlreadyMember
            | AccessError::RoleNotAssignable
            | AccessError::SlugOrSubdomainTaken => 409,
            AccessError::NotFound => 404,
            AccessError::StorageTimeout => 504,
            AccessError::Storage(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::NotAMember => "NOT_A_MEMBER",
            AccessError::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            AccessError::InvitationExpired => "INVITATION_EXPIRED",
            AccessError::InvitationAlreadyResolved => "INVITATION_ALREADY_RESOLVED",
            AccessError::InvitationEmailMismatch => "INVITATION_EMAIL_MISMATCH",
            AccessError::AlreadyMember => "ALREADY_MEMBER",
            AccessError::RoleNotAssignable => "ROLE_NOT_ASSIGNABLE",
            AccessError::SlugOrSubdomainTaken => "SLUG_OR_SUBDOMAIN_TAKEN",
            AccessError::StorageTimeout => "STORAGE_TIMEOUT",
            AccessError::NotFound => "NOT_FOUND",
            AccessError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AccessError::NotAMember.status_code(), 403);
        assert_eq!(AccessError::InsufficientPermission.status_code(), 403);
        assert_eq!(AccessError::InvitationExpired.status_code(), 410);
        assert_eq!(AccessError::InvitationAlreadyResolved.status_code(), 409);
        assert_eq!(AccessError::StorageTimeout.status_code(), 504);
        assert_eq!(AccessError::NotFound.status_code(), 404);
    }

    #[test]
    fn test_server_errors() {
        assert!(AccessError::StorageTimeout.is_server_error());
        assert!(AccessError::Storage("down".into()).is_server_error());
        assert!(!AccessError::NotAMember.is_server_error());
        assert!(!AccessError::InvitationExpired.is_server_error());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AccessError::NotAMember.error_code(), "NOT_A_MEMBER");
        assert_eq!(
            AccessError::InvitationAlreadyResolved.error_code(),
            "INVITATION_ALREADY_RESOLVED"
        );
    }
}
