//! Known permission catalog
//!
//! The closed set of permission categories the editor shows as toggles, and
//! the translation between those categories and raw `permission` statements.
//!
//! A raw statement belongs to a category only when class name, target and
//! actions equal the canonical statement exactly. Anything else, including
//! a wider target such as `${user.home}${/}-` or reordered actions, is kept
//! as a custom permission and written back unchanged. A statement carrying
//! its own `signedBy` never matches a category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::descriptor::PermissionDescriptor;
use crate::core::PolicyError;

pub const FILE_PERMISSION: &str = "java.io.FilePermission";
pub const PROPERTY_PERMISSION: &str = "java.util.PropertyPermission";
pub const REFLECT_PERMISSION: &str = "java.lang.reflect.ReflectPermission";
pub const RUNTIME_PERMISSION: &str = "java.lang.RuntimePermission";
pub const SOCKET_PERMISSION: &str = "java.net.SocketPermission";
pub const AWT_PERMISSION: &str = "java.awt.AWTPermission";
pub const AUDIO_PERMISSION: &str = "javax.sound.sampled.AudioPermission";

const ALL: &str = "*";
const ALL_FILES: &str = "<<ALL FILES>>";
const USER_HOME: &str = "${user.home}";
const TMPDIR: &str = "${java.io.tmpdir}";

const NONE: &str = "";
const READ: &str = "read";
const WRITE: &str = "write";
const DELETE: &str = "delete";
const EXECUTE: &str = "execute";
const NET_ALL: &str = "connect,listen,accept,resolve";

/// Static description of one category
struct CategoryDef {
    name: &'static str,
    description: &'static str,
    class_name: &'static str,
    target: &'static str,
    actions: &'static str,
}

impl CategoryDef {
    fn new(
        name: &'static str,
        description: &'static str,
        class_name: &'static str,
        target: &'static str,
        actions: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            class_name,
            target,
            actions,
        }
    }
}

/// A permission category with a dedicated toggle in the editor
///
/// The declaration order is the fixed catalog order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnownPermission {
    ReadLocalFiles,
    WriteLocalFiles,
    DeleteLocalFiles,
    ReadProperties,
    WriteProperties,
    ReadSystemFiles,
    WriteSystemFiles,
    ReadTmpFiles,
    WriteTmpFiles,
    DeleteTmpFiles,
    JavaReflection,
    GetClassloader,
    AccessClassInPackage,
    AccessDeclaredMembers,
    AccessThreads,
    AccessThreadGroups,
    Network,
    ExecCommands,
    GetEnv,
    AllAwt,
    Clipboard,
    PlayAudio,
    RecordAudio,
    Print,
}

impl KnownPermission {
    /// Every category, in catalog order
    pub const ALL: [KnownPermission; 24] = [
        KnownPermission::ReadLocalFiles,
        KnownPermission::WriteLocalFiles,
        KnownPermission::DeleteLocalFiles,
        KnownPermission::ReadProperties,
        KnownPermission::WriteProperties,
        KnownPermission::ReadSystemFiles,
        KnownPermission::WriteSystemFiles,
        KnownPermission::ReadTmpFiles,
        KnownPermission::WriteTmpFiles,
        KnownPermission::DeleteTmpFiles,
        KnownPermission::JavaReflection,
        KnownPermission::GetClassloader,
        KnownPermission::AccessClassInPackage,
        KnownPermission::AccessDeclaredMembers,
        KnownPermission::AccessThreads,
        KnownPermission::AccessThreadGroups,
        KnownPermission::Network,
        KnownPermission::ExecCommands,
        KnownPermission::GetEnv,
        KnownPermission::AllAwt,
        KnownPermission::Clipboard,
        KnownPermission::PlayAudio,
        KnownPermission::RecordAudio,
        KnownPermission::Print,
    ];

    fn definition(self) -> CategoryDef {
        use KnownPermission::*;
        match self {
            ReadLocalFiles => CategoryDef::new(
                "read-local-files",
                "Read files in the user's home directory",
                FILE_PERMISSION,
                USER_HOME,
                READ,
            ),
            WriteLocalFiles => CategoryDef::new(
                "write-local-files",
                "Write files in the user's home directory",
                FILE_PERMISSION,
                USER_HOME,
                WRITE,
            ),
            DeleteLocalFiles => CategoryDef::new(
                "delete-local-files",
                "Delete files in the user's home directory",
                FILE_PERMISSION,
                USER_HOME,
                DELETE,
            ),
            ReadProperties => CategoryDef::new(
                "read-properties",
                "Read system properties",
                PROPERTY_PERMISSION,
                ALL,
                READ,
            ),
            WriteProperties => CategoryDef::new(
                "write-properties",
                "Write system properties",
                PROPERTY_PERMISSION,
                ALL,
                WRITE,
            ),
            ReadSystemFiles => CategoryDef::new(
                "read-system-files",
                "Read any file on the system",
                FILE_PERMISSION,
                ALL_FILES,
                READ,
            ),
            WriteSystemFiles => CategoryDef::new(
                "write-system-files",
                "Write any file on the system",
                FILE_PERMISSION,
                ALL_FILES,
                WRITE,
            ),
            ReadTmpFiles => CategoryDef::new(
                "read-tmp-files",
                "Read files in the temporary directory",
                FILE_PERMISSION,
                TMPDIR,
                READ,
            ),
            WriteTmpFiles => CategoryDef::new(
                "write-tmp-files",
                "Write files in the temporary directory",
                FILE_PERMISSION,
                TMPDIR,
                WRITE,
            ),
            DeleteTmpFiles => CategoryDef::new(
                "delete-tmp-files",
                "Delete files in the temporary directory",
                FILE_PERMISSION,
                TMPDIR,
                DELETE,
            ),
            JavaReflection => CategoryDef::new(
                "java-reflection",
                "Suppress access checks through reflection",
                REFLECT_PERMISSION,
                "suppressAccessChecks",
                NONE,
            ),
            GetClassloader => CategoryDef::new(
                "get-classloader",
                "Obtain class loaders",
                RUNTIME_PERMISSION,
                "getClassLoader",
                NONE,
            ),
            AccessClassInPackage => CategoryDef::new(
                "access-class-in-package",
                "Access classes in any package",
                RUNTIME_PERMISSION,
                "accessClassInPackage.*",
                NONE,
            ),
            AccessDeclaredMembers => CategoryDef::new(
                "access-declared-members",
                "Access declared members of any class",
                RUNTIME_PERMISSION,
                "accessDeclaredMembers",
                NONE,
            ),
            AccessThreads => CategoryDef::new(
                "access-threads",
                "Modify threads not owned by the application",
                RUNTIME_PERMISSION,
                "modifyThread",
                NONE,
            ),
            AccessThreadGroups => CategoryDef::new(
                "access-thread-groups",
                "Modify thread groups not owned by the application",
                RUNTIME_PERMISSION,
                "modifyThreadGroup",
                NONE,
            ),
            Network => CategoryDef::new(
                "network",
                "Connect to, listen on and accept connections from any host",
                SOCKET_PERMISSION,
                ALL,
                NET_ALL,
            ),
            ExecCommands => CategoryDef::new(
                "exec-commands",
                "Execute programs on the system",
                FILE_PERMISSION,
                ALL_FILES,
                EXECUTE,
            ),
            GetEnv => CategoryDef::new(
                "get-env",
                "Read environment variables",
                RUNTIME_PERMISSION,
                "getenv.*",
                NONE,
            ),
            AllAwt => CategoryDef::new(
                "all-awt",
                "Every AWT permission",
                AWT_PERMISSION,
                ALL,
                NONE,
            ),
            Clipboard => CategoryDef::new(
                "clipboard",
                "Access the system clipboard",
                AWT_PERMISSION,
                "accessClipboard",
                NONE,
            ),
            PlayAudio => CategoryDef::new(
                "play-audio",
                "Play audio",
                AUDIO_PERMISSION,
                "play",
                NONE,
            ),
            RecordAudio => CategoryDef::new(
                "record-audio",
                "Record audio",
                AUDIO_PERMISSION,
                "record",
                NONE,
            ),
            Print => CategoryDef::new(
                "print",
                "Queue print jobs",
                RUNTIME_PERMISSION,
                "queuePrintJob",
                NONE,
            ),
        }
    }

    /// Stable kebab-case name, e.g. `read-local-files`
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Human readable description
    pub fn description(self) -> &'static str {
        self.definition().description
    }

    /// Permission class of the canonical statement
    pub fn class_name(self) -> &'static str {
        self.definition().class_name
    }

    /// Target of the canonical statement
    pub fn target(self) -> &'static str {
        self.definition().target
    }

    /// Actions of the canonical statement (empty when none)
    pub fn actions(self) -> &'static str {
        self.definition().actions
    }

    /// The canonical statement emitted when this category is granted
    pub fn descriptor(self) -> PermissionDescriptor {
        let def = self.definition();
        PermissionDescriptor::with_actions(def.class_name, def.target, def.actions)
    }

    /// Whether a raw statement is an instance of this category
    pub fn matches(self, descriptor: &PermissionDescriptor) -> bool {
        let def = self.definition();
        if descriptor.signed_by.is_some() || descriptor.class_name != def.class_name {
            return false;
        }
        descriptor.target == def.target && descriptor.actions == def.actions
    }

    /// Policy statement text for the canonical statement
    pub fn to_permission_string(self) -> String {
        self.descriptor().to_permission_string()
    }
}

impl fmt::Display for KnownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownPermission {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        KnownPermission::ALL
            .iter()
            .copied()
            .find(|perm| perm.name() == wanted)
            .ok_or_else(|| PolicyError::UnknownPermission(s.to_string()))
    }
}

/// All categories in the fixed catalog order
pub fn all_categories() -> &'static [KnownPermission] {
    &KnownPermission::ALL
}

/// Find the category a raw statement belongs to, if any
pub fn classify(descriptor: &PermissionDescriptor) -> Option<KnownPermission> {
    KnownPermission::ALL
        .iter()
        .copied()
        .find(|perm| perm.matches(descriptor))
}

/// Statements to write for a granted category
pub fn expand(permission: KnownPermission) -> Vec<PermissionDescriptor> {
    vec![permission.descriptor()]
}
