//! Permission vocabulary of a policy file
//!
//! - `PermissionDescriptor` / `PrincipalEntry`: raw statements exactly as they
//!   appear in a policy file
//! - `KnownPermission`: the closed catalog of categories the editor toggles,
//!   with `classify` (raw → category) and `expand` (category → raw)
//! - `PermissionGroup`: bundles of related categories
//!
//! ## Example
//!
//! ```rust
//! use policyedit::permissions::{classify, KnownPermission, PermissionDescriptor};
//!
//! let raw = PermissionDescriptor::new("java.awt.AWTPermission", "accessClipboard");
//! assert_eq!(classify(&raw), Some(KnownPermission::Clipboard));
//! ```

pub mod catalog;
mod descriptor;
mod group;

pub use catalog::{all_categories, classify, expand, KnownPermission};
pub use descriptor::{PermissionDescriptor, PrincipalEntry};
pub use group::{GroupState, PermissionGroup};
