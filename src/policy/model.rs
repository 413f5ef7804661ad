//! Policy file model
//!
//! The editable in-memory form of one policy file. Every identifier the model
//! knows has a complete category map (every `KnownPermission` present, false
//! unless granted) and a custom-permission set. Getters hand out owned copies;
//! nothing returned by the model aliases its internal state.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Clipboard, FileFingerprint, PolicyEntry, PolicyIdentifier, Scope};
use crate::core::{PolicyError, PolicyResult};
use crate::parser::{read_clauses, write_clauses, GrantClause};
use crate::permissions::{all_categories, classify, expand, KnownPermission, PermissionDescriptor};

/// Category flags of one identifier
pub type PermissionMap = BTreeMap<KnownPermission, bool>;

/// Map with every category present and not granted
pub fn default_permission_map() -> PermissionMap {
    all_categories().iter().map(|p| (*p, false)).collect()
}

fn identifier_of(clause: &GrantClause) -> PolicyIdentifier {
    if clause.is_unscoped() {
        PolicyIdentifier::AllCode
    } else {
        PolicyIdentifier::Scoped(Scope {
            signed_by: clause.signed_by.clone(),
            principals: clause.principals.clone(),
            codebase: clause.codebase.clone(),
        })
    }
}

/// Policy file contents keyed by grant scope
#[derive(Debug)]
pub struct PolicyFileModel {
    file: Option<PathBuf>,
    permissions: BTreeMap<PolicyIdentifier, PermissionMap>,
    custom_permissions: BTreeMap<PolicyIdentifier, BTreeSet<PermissionDescriptor>>,
    fingerprint: Option<FileFingerprint>,
    clipboard: Arc<Clipboard>,
}

impl Default for PolicyFileModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyFileModel {
    /// Create an empty model with no backing file and its own clipboard
    pub fn new() -> Self {
        Self {
            file: None,
            permissions: BTreeMap::new(),
            custom_permissions: BTreeMap::new(),
            fingerprint: None,
            clipboard: Arc::new(Clipboard::new()),
        }
    }

    /// Create an empty model bound to `path`
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let mut model = Self::new();
        model.file = Some(path.into());
        model
    }

    /// Use a clipboard shared with other models
    pub fn with_clipboard(mut self, clipboard: Arc<Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Rebind the backing file. Does not load it.
    pub fn set_file(&mut self, file: Option<PathBuf>) {
        self.file = file;
        self.fingerprint = None;
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn clipboard(&self) -> &Arc<Clipboard> {
        &self.clipboard
    }

    fn bound_file(&self) -> PolicyResult<PathBuf> {
        self.file.clone().ok_or(PolicyError::NoFileBound)
    }

    /// Replace the model contents with the backing file's
    ///
    /// On error the current contents are left untouched.
    pub fn open_and_parse(&mut self) -> PolicyResult<()> {
        let path = self.bound_file()?;
        let text = fs::read_to_string(&path)?;
        let clauses = read_clauses(&text)?;

        let mut permissions = BTreeMap::new();
        let mut custom_permissions = BTreeMap::new();
        for clause in &clauses {
            let identifier = identifier_of(clause);
            let flags = permissions
                .entry(identifier.clone())
                .or_insert_with(default_permission_map);
            let custom: &mut BTreeSet<PermissionDescriptor> =
                custom_permissions.entry(identifier).or_default();

            for descriptor in &clause.permissions {
                match classify(descriptor) {
                    Some(known) => {
                        flags.insert(known, true);
                    }
                    None => {
                        custom.insert(descriptor.clone());
                    }
                }
            }
        }

        tracing::info!(
            "Loaded {} identifier(s) from {}",
            permissions.len(),
            path.display()
        );
        self.permissions = permissions;
        self.custom_permissions = custom_permissions;
        self.fingerprint = Some(FileFingerprint::of_bytes(text.as_bytes()));
        Ok(())
    }

    /// Build one clause per identifier, in identifier order
    pub fn to_clauses(&self) -> Vec<GrantClause> {
        self.permissions
            .iter()
            .map(|(identifier, flags)| {
                let mut permissions: Vec<PermissionDescriptor> = flags
                    .iter()
                    .filter(|(_, granted)| **granted)
                    .flat_map(|(known, _)| expand(*known))
                    .collect();
                if let Some(custom) = self.custom_permissions.get(identifier) {
                    permissions.extend(custom.iter().cloned());
                }

                GrantClause {
                    signed_by: identifier.signed_by().map(str::to_string),
                    codebase: identifier.codebase().map(str::to_string),
                    principals: identifier.principals(),
                    permissions,
                }
            })
            .collect()
    }

    /// Write the model to the backing file
    pub fn save(&mut self) -> PolicyResult<()> {
        let path = self.bound_file()?;
        let clauses = self.to_clauses();
        let text = write_clauses(&clauses);
        fs::write(&path, &text)?;

        tracing::info!("Saved {} grant clause(s) to {}", clauses.len(), path.display());
        self.fingerprint = Some(FileFingerprint::of_bytes(text.as_bytes()));
        Ok(())
    }

    /// Whether the backing file differs from what was last loaded or saved
    ///
    /// False if nothing has been loaded or saved yet. A file that can no
    /// longer be read counts as changed.
    pub fn has_changed(&self) -> bool {
        let (Some(path), Some(recorded)) = (&self.file, &self.fingerprint) else {
            return false;
        };
        match FileFingerprint::of_file(path) {
            Ok(current) => current != *recorded,
            Err(e) => {
                tracing::debug!("Could not fingerprint {}: {}", path.display(), e);
                true
            }
        }
    }

    pub fn identifiers(&self) -> BTreeSet<PolicyIdentifier> {
        self.permissions.keys().cloned().collect()
    }

    pub fn contains(&self, identifier: &PolicyIdentifier) -> bool {
        self.permissions.contains_key(identifier)
    }

    /// Add an identifier with nothing granted
    ///
    /// Returns false if it was already present, in which case nothing changes.
    pub fn add_identifier(&mut self, identifier: PolicyIdentifier) -> bool {
        if self.permissions.contains_key(&identifier) {
            return false;
        }
        tracing::debug!("Adding identifier {}", identifier);
        self.custom_permissions.entry(identifier.clone()).or_default();
        self.permissions.insert(identifier, default_permission_map());
        true
    }

    /// Remove an identifier with all its permissions
    pub fn remove_identifier(&mut self, identifier: &PolicyIdentifier) -> bool {
        self.custom_permissions.remove(identifier);
        self.permissions.remove(identifier).is_some()
    }

    /// Whether `permission` is granted to `identifier`; false for unknown ids
    pub fn permission(&self, identifier: &PolicyIdentifier, permission: KnownPermission) -> bool {
        self.permissions
            .get(identifier)
            .and_then(|flags| flags.get(&permission).copied())
            .unwrap_or(false)
    }

    /// Grant or revoke a category, adding the identifier if needed
    pub fn set_permission(
        &mut self,
        identifier: &PolicyIdentifier,
        permission: KnownPermission,
        granted: bool,
    ) {
        self.add_identifier(identifier.clone());
        if let Some(flags) = self.permissions.get_mut(identifier) {
            flags.insert(permission, granted);
        }
    }

    /// Category map of one identifier; all false for unknown ids
    pub fn permissions_for(&self, identifier: &PolicyIdentifier) -> PermissionMap {
        self.permissions
            .get(identifier)
            .cloned()
            .unwrap_or_else(default_permission_map)
    }

    pub fn copy_of_permissions(&self) -> BTreeMap<PolicyIdentifier, PermissionMap> {
        self.permissions.clone()
    }

    /// Drop every identifier along with its custom permissions
    pub fn clear_permissions(&mut self) {
        self.permissions.clear();
        self.custom_permissions.clear();
    }

    /// Add custom permissions, adding the identifier if needed
    pub fn add_custom_permissions<I>(&mut self, identifier: &PolicyIdentifier, custom: I)
    where
        I: IntoIterator<Item = PermissionDescriptor>,
    {
        self.add_identifier(identifier.clone());
        self.custom_permissions
            .entry(identifier.clone())
            .or_default()
            .extend(custom);
    }

    /// Empty one identifier's custom permissions; its categories are kept
    pub fn clear_custom_identifier(&mut self, identifier: &PolicyIdentifier) {
        if let Some(custom) = self.custom_permissions.get_mut(identifier) {
            custom.clear();
        }
    }

    /// Drop the custom permissions of every identifier
    pub fn clear_custom_permissions(&mut self) {
        self.custom_permissions.clear();
    }

    pub fn custom_permissions_for(&self, identifier: &PolicyIdentifier) -> BTreeSet<PermissionDescriptor> {
        self.custom_permissions
            .get(identifier)
            .cloned()
            .unwrap_or_default()
    }

    pub fn copy_of_custom_permissions(
        &self,
    ) -> BTreeMap<PolicyIdentifier, BTreeSet<PermissionDescriptor>> {
        self.custom_permissions.clone()
    }

    /// Snapshot of one identifier; empty for unknown ids
    pub fn policy_entry(&self, identifier: &PolicyIdentifier) -> PolicyEntry {
        let granted = self
            .permissions_for(identifier)
            .into_iter()
            .filter_map(|(known, granted)| granted.then_some(known));
        PolicyEntry::from_parts(
            identifier.clone(),
            granted.collect(),
            self.custom_permissions_for(identifier),
        )
    }

    /// Add an entry's identifier and grant what it grants
    ///
    /// Categories already granted to an existing identifier stay granted.
    pub fn add_policy_entry(&mut self, entry: PolicyEntry) {
        let (identifier, granted, custom) = entry.into_parts();
        for permission in granted {
            self.set_permission(&identifier, permission, true);
        }
        self.add_custom_permissions(&identifier, custom);
    }

    /// Put a snapshot of `identifier` on the clipboard
    pub fn copy_entry(&self, identifier: &PolicyIdentifier) {
        self.clipboard.copy(self.policy_entry(identifier));
    }

    /// Add the clipboard's entitlements under `identifier`
    pub fn paste_entry(&mut self, identifier: PolicyIdentifier) -> PolicyResult<()> {
        let copied = self.clipboard.read()?;
        let (_, granted, custom) = copied.into_parts();
        let entry = PolicyEntry::from_parts(identifier, granted, custom);
        tracing::debug!("Pasting clipboard into {}", entry.identifier());
        self.add_policy_entry(entry);
        Ok(())
    }
}
