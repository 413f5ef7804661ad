//! Permission groups
//!
//! Groups bundle related categories so a front end can toggle them together
//! and show a summary state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::KnownPermission;

/// Summary of a group's members for one identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupState {
    /// Every member is granted
    All,
    /// No member is granted
    None,
    /// Some members are granted, or a member is missing from the map
    Mixed,
}

/// A named bundle of related categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionGroup {
    ReadFileSystem,
    WriteFileSystem,
    AccessUnownedCode,
    MediaAccess,
}

impl PermissionGroup {
    pub const ALL: [PermissionGroup; 4] = [
        PermissionGroup::ReadFileSystem,
        PermissionGroup::WriteFileSystem,
        PermissionGroup::AccessUnownedCode,
        PermissionGroup::MediaAccess,
    ];

    /// Group title
    pub fn title(self) -> &'static str {
        match self {
            PermissionGroup::ReadFileSystem => "Read from file system",
            PermissionGroup::WriteFileSystem => "Write to file system",
            PermissionGroup::AccessUnownedCode => "Access unowned code",
            PermissionGroup::MediaAccess => "Media access",
        }
    }

    /// Member categories
    pub fn permissions(self) -> &'static [KnownPermission] {
        use KnownPermission::*;
        match self {
            PermissionGroup::ReadFileSystem => &[
                ReadLocalFiles,
                ReadProperties,
                ReadSystemFiles,
                ReadTmpFiles,
                GetEnv,
            ],
            PermissionGroup::WriteFileSystem => &[
                WriteLocalFiles,
                DeleteLocalFiles,
                WriteProperties,
                WriteSystemFiles,
                WriteTmpFiles,
                DeleteTmpFiles,
                ExecCommands,
            ],
            PermissionGroup::AccessUnownedCode => &[
                JavaReflection,
                GetClassloader,
                AccessClassInPackage,
                AccessDeclaredMembers,
                AccessThreads,
                AccessThreadGroups,
            ],
            PermissionGroup::MediaAccess => &[PlayAudio, RecordAudio, Print, Clipboard],
        }
    }

    /// Whether a category belongs to this group
    pub fn contains(self, permission: KnownPermission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Whether any group contains the category
    pub fn any_contains(permission: KnownPermission) -> bool {
        Self::ALL.iter().any(|group| group.contains(permission))
    }

    /// Groups the category belongs to
    pub fn of(permission: KnownPermission) -> Vec<PermissionGroup> {
        Self::ALL
            .iter()
            .copied()
            .filter(|group| group.contains(permission))
            .collect()
    }

    /// Summarize the members' flags in a permission map
    pub fn state(self, permissions: &BTreeMap<KnownPermission, bool>) -> GroupState {
        let mut all_true = true;
        let mut all_false = true;
        for perm in self.permissions() {
            match permissions.get(perm) {
                None => return GroupState::Mixed,
                Some(true) => all_false = false,
                Some(false) => all_true = false,
            }
        }
        if all_false {
            GroupState::None
        } else if all_true {
            GroupState::All
        } else {
            GroupState::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::catalog::all_categories;

    fn defaulted() -> BTreeMap<KnownPermission, bool> {
        all_categories().iter().map(|p| (*p, false)).collect()
    }

    #[test]
    fn test_state_none_all_mixed() {
        let mut map = defaulted();
        assert_eq!(PermissionGroup::MediaAccess.state(&map), GroupState::None);

        map.insert(KnownPermission::Clipboard, true);
        assert_eq!(PermissionGroup::MediaAccess.state(&map), GroupState::Mixed);

        for perm in PermissionGroup::MediaAccess.permissions() {
            map.insert(*perm, true);
        }
        assert_eq!(PermissionGroup::MediaAccess.state(&map), GroupState::All);
        assert_eq!(PermissionGroup::ReadFileSystem.state(&map), GroupState::None);
    }

    #[test]
    fn test_missing_member_is_mixed() {
        let mut map = defaulted();
        map.remove(&KnownPermission::Print);
        assert_eq!(PermissionGroup::MediaAccess.state(&map), GroupState::Mixed);
    }

    #[test]
    fn test_membership() {
        assert!(PermissionGroup::ReadFileSystem.contains(KnownPermission::GetEnv));
        assert!(!PermissionGroup::ReadFileSystem.contains(KnownPermission::Network));
        assert!(PermissionGroup::any_contains(KnownPermission::ExecCommands));
        assert!(!PermissionGroup::any_contains(KnownPermission::Network));
        assert!(!PermissionGroup::any_contains(KnownPermission::AllAwt));
        assert_eq!(
            PermissionGroup::of(KnownPermission::Clipboard),
            vec![PermissionGroup::MediaAccess]
        );
    }
}
