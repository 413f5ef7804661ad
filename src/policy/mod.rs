//! Policy file model
//!
//! - `PolicyIdentifier`: key of one grant scope, with `AllCode` for clauses
//!   that apply to everything
//! - `PolicyEntry`: snapshot of one scope's entitlements
//! - `PolicyFileModel`: every scope of one policy file, with load, save and
//!   external change detection
//! - `Clipboard`: single-slot store used by copy and paste

mod clipboard;
mod entry;
mod fingerprint;
mod identifier;
mod model;

pub use clipboard::Clipboard;
pub use entry::{PolicyEntry, PolicyEntryBuilder};
pub use fingerprint::FileFingerprint;
pub use identifier::{PolicyIdentifier, Scope};
pub use model::{default_permission_map, PermissionMap, PolicyFileModel};
