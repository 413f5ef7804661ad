//! Raw permission and principal records
//!
//! These are the values that appear verbatim in a policy file. They are used
//! both for permissions the catalog recognizes and for ones it does not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One concrete `permission` statement
///
/// `actions` is the empty string when the statement has none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionDescriptor {
    /// Permission class, e.g. `java.io.FilePermission`
    pub class_name: String,
    /// Target name, e.g. `${user.home}`
    pub target: String,
    /// Comma separated actions, e.g. `read,write`
    #[serde(default)]
    pub actions: String,
    /// Optional `signedBy` on the permission statement itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
}

impl PermissionDescriptor {
    /// Create a descriptor without actions
    pub fn new(class_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            target: target.into(),
            actions: String::new(),
            signed_by: None,
        }
    }

    /// Create a descriptor with actions
    pub fn with_actions(
        class_name: impl Into<String>,
        target: impl Into<String>,
        actions: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            target: target.into(),
            actions: actions.into(),
            signed_by: None,
        }
    }

    /// Attach a permission-level signer
    pub fn signed_by(mut self, signer: impl Into<String>) -> Self {
        self.signed_by = Some(signer.into());
        self
    }

    /// Whether the statement carries an actions string, even a blank one
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Policy statement text for this permission
    pub fn to_permission_string(&self) -> String {
        let mut out = format!("permission {} \"{}\"", self.class_name, self.target);
        if self.has_actions() {
            out.push_str(&format!(", \"{}\"", self.actions));
        }
        if let Some(signer) = &self.signed_by {
            out.push_str(&format!(", signedBy \"{}\"", signer));
        }
        out.push(';');
        out
    }
}

impl fmt::Display for PermissionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_permission_string())
    }
}

/// A `principal <class> "<name>"` element of a grant scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrincipalEntry {
    /// Principal class, e.g. `javax.security.auth.x500.X500Principal`
    pub principal_class: String,
    /// Principal name
    pub principal_name: String,
}

impl PrincipalEntry {
    /// Create a new principal entry
    pub fn new(principal_class: impl Into<String>, principal_name: impl Into<String>) -> Self {
        Self {
            principal_class: principal_class.into(),
            principal_name: principal_name.into(),
        }
    }
}

impl fmt::Display for PrincipalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.principal_class, self.principal_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_default_to_empty() {
        let perm = PermissionDescriptor::new("java.lang.RuntimePermission", "createClassLoader");
        assert_eq!(perm.actions, "");
        assert!(!perm.has_actions());
        assert!(PermissionDescriptor::with_actions("a.B", "t", " ").has_actions());
        assert_eq!(
            perm,
            PermissionDescriptor::with_actions("java.lang.RuntimePermission", "createClassLoader", "")
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = PermissionDescriptor::with_actions("java.io.FilePermission", "*", "write");
        let b = PermissionDescriptor::with_actions("java.io.FilePermission", "*", "write");
        let c = PermissionDescriptor::with_actions("java.io.FilePermission", "*", "read");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, b.clone().signed_by("someCA"));
    }

    #[test]
    fn test_permission_string() {
        let perm = PermissionDescriptor::with_actions("java.io.FilePermission", "${user.home}", "read");
        assert_eq!(
            perm.to_permission_string(),
            "permission java.io.FilePermission \"${user.home}\", \"read\";"
        );

        let perm = PermissionDescriptor::new("javax.sound.sampled.AudioPermission", "play");
        assert_eq!(
            perm.to_string(),
            "permission javax.sound.sampled.AudioPermission \"play\";"
        );
    }

    #[test]
    fn test_principal_display() {
        let principal = PrincipalEntry::new("javax.security.auth.x500.X500Principal", "cn=Duke");
        assert_eq!(
            principal.to_string(),
            "javax.security.auth.x500.X500Principal \"cn=Duke\""
        );
    }
}
