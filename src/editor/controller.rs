//! Editing session over one policy file
//!
//! `PolicyEditorController` is what a front end drives. It wraps a
//! `PolicyFileModel`, tracks whether there are unsaved edits, and checks
//! codebases before they become identifiers.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::core::{PolicyError, PolicyResult};
use crate::permissions::{KnownPermission, PermissionDescriptor};
use crate::policy::{Clipboard, PermissionMap, PolicyEntry, PolicyFileModel, PolicyIdentifier};

const CODEBASE_PATTERN: &str = r"^(?i:https?|ftp|file|jar):\S+$";

static CODEBASE_REGEX: OnceLock<Regex> = OnceLock::new();

fn codebase_regex() -> PolicyResult<&'static Regex> {
    if let Some(regex) = CODEBASE_REGEX.get() {
        return Ok(regex);
    }
    let regex = Regex::new(CODEBASE_PATTERN)
        .map_err(|e| PolicyError::InvalidCodebase(e.to_string()))?;
    Ok(CODEBASE_REGEX.get_or_init(|| regex))
}

/// Check that a codebase is empty or a URL with a supported scheme
///
/// Supported schemes are `http`, `https`, `ftp`, `file` and `jar`.
pub fn validate_codebase(codebase: &str) -> PolicyResult<()> {
    if codebase.is_empty() || codebase_regex()?.is_match(codebase) {
        Ok(())
    } else {
        Err(PolicyError::InvalidCodebase(codebase.to_string()))
    }
}

/// Identifier for a codebase typed by the user; empty means all code
pub fn identifier_from_codebase(codebase: &str) -> PolicyIdentifier {
    if codebase.is_empty() {
        PolicyIdentifier::AllCode
    } else {
        PolicyIdentifier::from_codebase(codebase)
    }
}

/// Editing session for one policy file
#[derive(Debug, Default)]
pub struct PolicyEditorController {
    model: PolicyFileModel,
    changes_made: bool,
}

impl PolicyEditorController {
    /// Create a controller with its own clipboard and no file
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller sharing `clipboard` with other sessions
    pub fn with_clipboard(clipboard: Arc<Clipboard>) -> Self {
        Self {
            model: PolicyFileModel::new().with_clipboard(clipboard),
            changes_made: false,
        }
    }

    pub fn model(&self) -> &PolicyFileModel {
        &self.model
    }

    pub fn set_file(&mut self, file: Option<PathBuf>) {
        self.model.set_file(file);
    }

    pub fn file(&self) -> Option<&Path> {
        self.model.file()
    }

    /// Whether there are edits that have not been saved
    pub fn changes_made(&self) -> bool {
        self.changes_made
    }

    pub fn set_changes_made(&mut self, changes_made: bool) {
        self.changes_made = changes_made;
    }

    /// Whether the file was modified by someone else since load or save
    pub fn file_has_changed(&self) -> bool {
        self.model.has_changed()
    }

    pub fn open_and_parse(&mut self) -> PolicyResult<()> {
        self.model.open_and_parse()?;
        self.changes_made = false;
        Ok(())
    }

    pub fn save(&mut self) -> PolicyResult<()> {
        self.model.save()?;
        self.changes_made = false;
        Ok(())
    }

    pub fn identifiers(&self) -> BTreeSet<PolicyIdentifier> {
        self.model.identifiers()
    }

    /// Add an identifier after checking its codebase
    pub fn add_identifier(&mut self, identifier: PolicyIdentifier) -> PolicyResult<bool> {
        if let Some(codebase) = identifier.codebase() {
            validate_codebase(codebase)?;
        }
        let added = self.model.add_identifier(identifier);
        self.changes_made |= added;
        Ok(added)
    }

    pub fn remove_identifier(&mut self, identifier: &PolicyIdentifier) -> bool {
        let removed = self.model.remove_identifier(identifier);
        self.changes_made |= removed;
        removed
    }

    pub fn permission(&self, identifier: &PolicyIdentifier, permission: KnownPermission) -> bool {
        self.model.permission(identifier, permission)
    }

    pub fn set_permission(
        &mut self,
        identifier: &PolicyIdentifier,
        permission: KnownPermission,
        granted: bool,
    ) {
        self.model.set_permission(identifier, permission, granted);
        self.changes_made = true;
    }

    /// Full category map for `identifier`, all false if it is unknown
    pub fn permissions(&self, identifier: &PolicyIdentifier) -> PermissionMap {
        self.model.permissions_for(identifier)
    }

    pub fn custom_permissions(&self, identifier: &PolicyIdentifier) -> BTreeSet<PermissionDescriptor> {
        self.model.custom_permissions_for(identifier)
    }

    pub fn clear_permissions(&mut self) {
        self.model.clear_permissions();
        self.changes_made = true;
    }

    pub fn add_custom_permission(&mut self, identifier: &PolicyIdentifier, permission: PermissionDescriptor) {
        self.model.add_custom_permissions(identifier, [permission]);
        self.changes_made = true;
    }

    pub fn clear_custom_identifier(&mut self, identifier: &PolicyIdentifier) {
        self.model.clear_custom_identifier(identifier);
        self.changes_made = true;
    }

    pub fn add_policy_entry(&mut self, entry: PolicyEntry) {
        self.model.add_policy_entry(entry);
        self.changes_made = true;
    }

    pub fn policy_entry(&self, identifier: &PolicyIdentifier) -> PolicyEntry {
        self.model.policy_entry(identifier)
    }

    pub fn copy_to_clipboard(&self, identifier: &PolicyIdentifier) {
        self.model.copy_entry(identifier);
    }

    /// Add the clipboard's entitlements under `identifier`
    pub fn paste_from_clipboard(&mut self, identifier: PolicyIdentifier) -> PolicyResult<()> {
        if let Some(codebase) = identifier.codebase() {
            validate_codebase(codebase)?;
        }
        self.model.paste_entry(identifier)?;
        self.changes_made = true;
        Ok(())
    }
}
