//! Grant scope identifiers
//!
//! A `PolicyIdentifier` names one grant scope: a signer, a set of principals
//! and a codebase. The "all code" scope is a separate variant, so no scoped
//! identifier can ever compare equal to it, even one with every field empty.
//!
//! Ordering (used for display and for the order clauses are saved in):
//! 1. `AllCode` before everything else
//! 2. `signed_by`: present before absent, present values lexicographically
//! 3. `principals`: empty before non-empty, non-empty sets lexicographically
//! 4. `codebase`: absent before present, present values lexicographically
//!
//! Codebases are compared exactly; `http://x` and `http://x/` are different.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::permissions::PrincipalEntry;

/// Fields of a scoped identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub signed_by: Option<String>,
    #[serde(default)]
    pub principals: BTreeSet<PrincipalEntry>,
    pub codebase: Option<String>,
}

impl Ord for Scope {
    fn cmp(&self, other: &Self) -> Ordering {
        let signed_by = match (&self.signed_by, &other.signed_by) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        signed_by
            .then_with(|| self.principals.cmp(&other.principals))
            .then_with(|| self.codebase.cmp(&other.codebase))
    }
}

impl PartialOrd for Scope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Key of one grant scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyIdentifier {
    /// Applies to all code; a grant with no signer, principals or codebase
    AllCode,
    /// A grant limited by signer, principals and/or codebase
    Scoped(Scope),
}

impl PolicyIdentifier {
    /// Create a scoped identifier
    pub fn scoped<I>(signed_by: Option<&str>, principals: I, codebase: Option<&str>) -> Self
    where
        I: IntoIterator<Item = PrincipalEntry>,
    {
        PolicyIdentifier::Scoped(Scope {
            signed_by: signed_by.map(str::to_string),
            principals: principals.into_iter().collect(),
            codebase: codebase.map(str::to_string),
        })
    }

    /// Identifier scoped only by codebase
    pub fn from_codebase(codebase: impl Into<String>) -> Self {
        PolicyIdentifier::Scoped(Scope {
            signed_by: None,
            principals: BTreeSet::new(),
            codebase: Some(codebase.into()),
        })
    }

    /// Whether this is the all-code identifier
    pub fn is_all_code(&self) -> bool {
        matches!(self, PolicyIdentifier::AllCode)
    }

    /// Whether this identifier is scoped only by a codebase
    pub fn is_codebase_only(&self) -> bool {
        match self {
            PolicyIdentifier::AllCode => false,
            PolicyIdentifier::Scoped(scope) => {
                scope.signed_by.as_deref().map_or(true, str::is_empty)
                    && scope.principals.is_empty()
                    && scope.codebase.is_some()
            }
        }
    }

    pub fn signed_by(&self) -> Option<&str> {
        match self {
            PolicyIdentifier::AllCode => None,
            PolicyIdentifier::Scoped(scope) => scope.signed_by.as_deref(),
        }
    }

    pub fn codebase(&self) -> Option<&str> {
        match self {
            PolicyIdentifier::AllCode => None,
            PolicyIdentifier::Scoped(scope) => scope.codebase.as_deref(),
        }
    }

    pub fn principals(&self) -> BTreeSet<PrincipalEntry> {
        match self {
            PolicyIdentifier::AllCode => BTreeSet::new(),
            PolicyIdentifier::Scoped(scope) => scope.principals.clone(),
        }
    }
}

impl fmt::Display for PolicyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self {
            PolicyIdentifier::AllCode => return f.write_str("All code"),
            PolicyIdentifier::Scoped(scope) => scope,
        };

        let mut parts = Vec::new();
        if let Some(signer) = &scope.signed_by {
            parts.push(format!("signedBy \"{}\"", signer));
        }
        if !scope.principals.is_empty() {
            let principals: Vec<String> = scope.principals.iter().map(|p| p.to_string()).collect();
            parts.push(format!("principals [{}]", principals.join(", ")));
        }
        if let Some(codebase) = &scope.codebase {
            parts.push(format!("codeBase \"{}\"", codebase));
        }
        if parts.is_empty() {
            f.write_str("(unscoped)")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
