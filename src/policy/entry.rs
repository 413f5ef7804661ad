//! Immutable snapshot of one grant scope

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::PolicyIdentifier;
use crate::core::{PolicyError, PolicyResult};
use crate::permissions::{KnownPermission, PermissionDescriptor};

/// One identifier with its granted categories and custom permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    identifier: PolicyIdentifier,
    permissions: BTreeSet<KnownPermission>,
    custom_permissions: BTreeSet<PermissionDescriptor>,
}

impl PolicyEntry {
    /// Start building an entry
    pub fn builder() -> PolicyEntryBuilder {
        PolicyEntryBuilder::default()
    }

    pub(crate) fn from_parts(
        identifier: PolicyIdentifier,
        permissions: BTreeSet<KnownPermission>,
        custom_permissions: BTreeSet<PermissionDescriptor>,
    ) -> Self {
        Self {
            identifier,
            permissions,
            custom_permissions,
        }
    }

    pub fn identifier(&self) -> &PolicyIdentifier {
        &self.identifier
    }

    /// Granted categories
    pub fn permissions(&self) -> &BTreeSet<KnownPermission> {
        &self.permissions
    }

    /// Permissions outside the known catalog
    pub fn custom_permissions(&self) -> &BTreeSet<PermissionDescriptor> {
        &self.custom_permissions
    }

    /// Consume the entry into its parts
    pub fn into_parts(
        self,
    ) -> (
        PolicyIdentifier,
        BTreeSet<KnownPermission>,
        BTreeSet<PermissionDescriptor>,
    ) {
        (self.identifier, self.permissions, self.custom_permissions)
    }
}

/// Builder for [`PolicyEntry`]
///
/// Both `permissions` and `custom_permissions` must be supplied, even if
/// empty. The identifier defaults to [`PolicyIdentifier::AllCode`].
#[derive(Debug, Default)]
pub struct PolicyEntryBuilder {
    identifier: Option<PolicyIdentifier>,
    permissions: Option<BTreeSet<KnownPermission>>,
    custom_permissions: Option<BTreeSet<PermissionDescriptor>>,
}

impl PolicyEntryBuilder {
    pub fn identifier(mut self, identifier: PolicyIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Scope the entry to a codebase only; `None` becomes `""`
    pub fn codebase(mut self, codebase: Option<&str>) -> Self {
        self.identifier = Some(PolicyIdentifier::from_codebase(codebase.unwrap_or("")));
        self
    }

    pub fn permissions<I>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = KnownPermission>,
    {
        self.permissions = Some(permissions.into_iter().collect());
        self
    }

    /// Set the custom permissions; `None` elements are dropped
    pub fn custom_permissions<I, T>(mut self, custom: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<PermissionDescriptor>>,
    {
        self.custom_permissions = Some(
            custom
                .into_iter()
                .filter_map(Into::<Option<PermissionDescriptor>>::into)
                .collect(),
        );
        self
    }

    pub fn build(self) -> PolicyResult<PolicyEntry> {
        let permissions = self
            .permissions
            .ok_or_else(|| PolicyError::invalid_entry("permissions were not set"))?;
        let custom_permissions = self
            .custom_permissions
            .ok_or_else(|| PolicyError::invalid_entry("custom permissions were not set"))?;

        Ok(PolicyEntry {
            identifier: self.identifier.unwrap_or(PolicyIdentifier::AllCode),
            permissions,
            custom_permissions,
        })
    }
}
