//! Single-slot clipboard for copying entitlements between identifiers
//!
//! Shared as `Arc<Clipboard>` between every model and controller of one
//! editing session. Each copy overwrites the slot; paste reads it without
//! clearing it.

use std::sync::RwLock;

use super::PolicyEntry;
use crate::core::{PolicyError, PolicyResult};

#[derive(Debug, Default)]
pub struct Clipboard {
    slot: RwLock<Option<PolicyEntry>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents
    pub fn copy(&self, entry: PolicyEntry) {
        tracing::debug!("Copying {} to clipboard", entry.identifier());
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(entry);
    }

    /// Current contents, left in place
    pub fn read(&self) -> PolicyResult<PolicyEntry> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.clone().ok_or(PolicyError::EmptyClipboard)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).is_none()
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{KnownPermission, PermissionDescriptor};

    fn entry(permission: KnownPermission) -> PolicyEntry {
        PolicyEntry::builder()
            .codebase(Some("http://example.com"))
            .permissions([permission])
            .custom_permissions(Vec::<PermissionDescriptor>::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_clipboard() {
        let clipboard = Clipboard::new();
        assert!(clipboard.is_empty());
        assert!(matches!(clipboard.read(), Err(PolicyError::EmptyClipboard)));
    }

    #[test]
    fn test_copy_overwrites_and_read_keeps() {
        let clipboard = Clipboard::new();
        clipboard.copy(entry(KnownPermission::Clipboard));
        clipboard.copy(entry(KnownPermission::Network));

        let first = clipboard.read().unwrap();
        let second = clipboard.read().unwrap();
        assert_eq!(first, second);
        assert!(first.permissions().contains(&KnownPermission::Network));
        assert!(!first.permissions().contains(&KnownPermission::Clipboard));

        clipboard.clear();
        assert!(clipboard.is_empty());
    }
}
