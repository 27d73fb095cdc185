//! # Actions
//!
//! Defines the verbs that can be performed on modules and submodules.
//! Like the module catalog, actions are a closed enumeration resolved at
//! compile time.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on a module or submodule.
///
/// Each grant in the permission matrix is an explicit (role, target,
/// action) row; no action implicitly includes another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// View resource data
    View,

    /// Create new resources
    Create,

    /// Modify existing resources
    Edit,

    /// Remove resources
    Delete,

    /// Administer configuration for the area
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }

    /// Parse an action from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_rbac::Action;
    ///
    /// assert_eq!(Action::parse("view"), Some(Action::View));
    /// assert_eq!(Action::parse("read"), Some(Action::View)); // Alias
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" | "read" | "get" => Some(Action::View),
            "create" | "add" | "new" => Some(Action::Create),
            "edit" | "update" | "write" | "modify" => Some(Action::Edit),
            "delete" | "remove" | "destroy" => Some(Action::Delete),
            "manage" | "admin" | "administer" => Some(Action::Manage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Delete,
            Action::Manage,
        ]
    }

    /// Check if this is a read-only action.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Action::View)
    }

    /// Check if this action modifies state.
    pub fn is_write(&self) -> bool {
        !self.is_read_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("view"), Some(Action::View));
        assert_eq!(Action::parse("read"), Some(Action::View));
        assert_eq!(Action::parse("edit"), Some(Action::Edit));
        assert_eq!(Action::parse("update"), Some(Action::Edit));
        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("MANAGE"), Some(Action::Manage));
        assert_eq!(Action::parse("invalid"), None);
    }

    #[test]
    fn test_action_as_str_round_trip() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_read_write_split() {
        assert!(Action::View.is_read_only());
        assert!(!Action::View.is_write());
        for action in [Action::Create, Action::Edit, Action::Delete, Action::Manage] {
            assert!(action.is_write());
        }
    }
}
