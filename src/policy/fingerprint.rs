//! On-disk state of the backing file
//!
//! An MD5 digest of the file contents, taken after each load and save. A
//! later digest that differs means someone else touched the file.

use std::fs;
use std::path::Path;

use crate::core::PolicyResult;

/// MD5 digest of a file's contents, as lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileFingerprint(String);

impl FileFingerprint {
    /// Digest the current contents of `path`
    pub fn of_file(path: &Path) -> PolicyResult<Self> {
        let data = fs::read(path)?;
        Ok(Self::of_bytes(&data))
    }

    pub fn of_bytes(data: &[u8]) -> Self {
        FileFingerprint(format!("{:x}", md5::compute(data)))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            FileFingerprint::of_bytes(b"").as_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_file_changes_are_detected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "grant {{ }};").unwrap();
        let before = FileFingerprint::of_file(file.path()).unwrap();
        assert_eq!(before, FileFingerprint::of_file(file.path()).unwrap());

        write!(file, "\n").unwrap();
        let after = FileFingerprint::of_file(file.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileFingerprint::of_file(&dir.path().join("missing.policy")).unwrap_err();
        assert!(err.is_not_found());
    }
}
