//! Policy file reader and writer
//!
//! Turns Java-style policy text into `GrantClause` records and back:
//!
//! ```text
//! grant signedBy "someCA", codeBase "http://example.com", principal a.B "name" {
//!     permission java.io.FilePermission "${user.home}", "read";
//! };
//! ```
//!
//! `//` and `/* */` comments, whitespace and line endings are insignificant.

mod lexer;
mod reader;
mod writer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::core::PolicyResult;
use crate::permissions::{PermissionDescriptor, PrincipalEntry};

pub use reader::read_clauses;
pub use writer::write_clauses;

/// One `grant { ... };` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantClause {
    /// `signedBy` value, if present
    pub signed_by: Option<String>,
    /// `codeBase` value, if present
    pub codebase: Option<String>,
    /// `principal` entries
    pub principals: BTreeSet<PrincipalEntry>,
    /// `permission` statements in file order
    pub permissions: Vec<PermissionDescriptor>,
}

impl GrantClause {
    /// Whether the clause has no signer, principals or codebase
    pub fn is_unscoped(&self) -> bool {
        self.signed_by.is_none() && self.principals.is_empty() && self.codebase.is_none()
    }
}

/// Read and parse a UTF-8 policy file
pub fn read_file(path: &Path) -> PolicyResult<Vec<GrantClause>> {
    let text = fs::read_to_string(path)?;
    read_clauses(&text)
}

/// Render clauses and overwrite `path` with the result
pub fn write_file(path: &Path, clauses: &[GrantClause]) -> PolicyResult<()> {
    fs::write(path, write_clauses(clauses))?;
    Ok(())
}
