//! Grant clause reader
//!
//! Recursive descent over the token stream produced by the lexer. Keywords
//! are case-insensitive. Keystore entries are accepted and skipped.

use super::lexer::{tokenize, Token, TokenKind};
use super::GrantClause;
use crate::core::{PolicyError, PolicyResult};
use crate::permissions::{PermissionDescriptor, PrincipalEntry};

struct Reader {
    tokens: Vec<Token>,
    pos: usize,
}

impl Reader {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    /// Line of the current token, or of the last token at end of input
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| t.kind.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> PolicyError {
        PolicyError::parse(self.line(), message)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(TokenKind::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PolicyResult<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    fn expect_quoted(&mut self, what: &str) -> PolicyResult<String> {
        match self.peek() {
            Some(TokenKind::Quoted(_)) => match self.advance() {
                Some(TokenKind::Quoted(s)) => Ok(s),
                _ => Err(self.error(format!("expected quoted {}", what))),
            },
            _ => Err(self.error(format!("expected quoted {}", what))),
        }
    }

    /// A bare word or a quoted string
    fn expect_name(&mut self, what: &str) -> PolicyResult<String> {
        match self.peek() {
            Some(TokenKind::Word(_)) | Some(TokenKind::Quoted(_)) => match self.advance() {
                Some(TokenKind::Word(s)) | Some(TokenKind::Quoted(s)) => Ok(s),
                _ => Err(self.error(format!("expected {}", what))),
            },
            _ => Err(self.error(format!("expected {}", what))),
        }
    }

    fn read_all(&mut self) -> PolicyResult<Vec<GrantClause>> {
        let mut clauses = Vec::new();
        while self.peek().is_some() {
            if self.peek_keyword("grant") {
                self.pos += 1;
                clauses.push(self.read_grant()?);
            } else if self.peek_keyword("keystore") || self.peek_keyword("keystorePasswordURL") {
                self.skip_keystore()?;
            } else {
                return Err(self.error("expected 'grant' or 'keystore'"));
            }
        }
        Ok(clauses)
    }

    fn skip_keystore(&mut self) -> PolicyResult<()> {
        let line = self.line();
        while let Some(kind) = self.advance() {
            if kind == TokenKind::Semicolon {
                tracing::warn!("Ignoring keystore entry on line {}", line);
                return Ok(());
            }
        }
        Err(PolicyError::parse(line, "keystore entry is missing ';'"))
    }

    fn read_grant(&mut self) -> PolicyResult<GrantClause> {
        let mut clause = GrantClause::default();

        loop {
            if self.eat(&TokenKind::LBrace) {
                break;
            } else if self.eat(&TokenKind::Comma) {
                continue;
            } else if self.peek_keyword("signedBy") {
                self.pos += 1;
                clause.signed_by = Some(self.expect_quoted("signer")?);
            } else if self.peek_keyword("codeBase") {
                self.pos += 1;
                clause.codebase = Some(self.expect_quoted("codebase")?);
            } else if self.peek_keyword("principal") {
                self.pos += 1;
                let class = self.expect_name("principal class")?;
                let name = self.expect_name("principal name")?;
                clause.principals.insert(PrincipalEntry::new(class, name));
            } else {
                return Err(self.error("expected 'signedBy', 'codeBase', 'principal' or '{'"));
            }
        }

        while !self.eat(&TokenKind::RBrace) {
            if self.peek().is_none() {
                return Err(self.error("grant entry is missing '}'"));
            }
            if !self.peek_keyword("permission") {
                return Err(self.error("expected 'permission' or '}'"));
            }
            self.pos += 1;
            clause.permissions.push(self.read_permission()?);
        }
        self.eat(&TokenKind::Semicolon);

        tracing::debug!(
            "Read grant clause with {} permission(s), codebase {:?}",
            clause.permissions.len(),
            clause.codebase
        );
        Ok(clause)
    }

    fn read_permission(&mut self) -> PolicyResult<PermissionDescriptor> {
        let class_name = self.expect_name("permission class")?;
        let mut descriptor = PermissionDescriptor::new(class_name, "");

        if let Some(TokenKind::Quoted(_)) = self.peek() {
            descriptor.target = self.expect_quoted("target")?;
        }

        while self.eat(&TokenKind::Comma) {
            if self.peek_keyword("signedBy") {
                self.pos += 1;
                descriptor.signed_by = Some(self.expect_quoted("signer")?);
            } else {
                descriptor.actions = self.expect_quoted("actions")?;
            }
        }

        self.expect(TokenKind::Semicolon, "';' after permission")?;
        Ok(descriptor)
    }
}

/// Read every grant clause in `text`, in file order
pub fn read_clauses(text: &str) -> PolicyResult<Vec<GrantClause>> {
    let tokens = tokenize(text)?;
    Reader::new(tokens).read_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    const READ_PERMISSION: &str = "permission java.io.FilePermission \"${user.home}\", \"read\";";
    const WRITE_PERMISSION: &str = "permission java.io.FilePermission \"${user.home}\", \"write\";";

    fn read_perm() -> PermissionDescriptor {
        PermissionDescriptor::with_actions("java.io.FilePermission", "${user.home}", "read")
    }

    fn write_perm() -> PermissionDescriptor {
        PermissionDescriptor::with_actions("java.io.FilePermission", "${user.home}", "write")
    }

    fn single(text: &str) -> GrantClause {
        let mut clauses = read_clauses(text).unwrap();
        assert_eq!(clauses.len(), 1, "expected one clause in {:?}", text);
        clauses.remove(0)
    }

    #[test]
    fn test_normal_policy() {
        let clause = single(&format!("grant {{\n\t{}\n}};\n", READ_PERMISSION));
        assert!(clause.is_unscoped());
        assert_eq!(clause.permissions, vec![read_perm()]);
    }

    #[test]
    fn test_line_ending_variants_are_equivalent() {
        let lf = format!("grant {{\n\t{}\n}};\n", READ_PERMISSION);
        let crlf = format!("grant {{\r\n\t{}\r\n}};\r\n", READ_PERMISSION);
        let mixed = format!("grant {{\n\n\t{}\r\n}};\n", READ_PERMISSION);
        let one_line = format!("grant {{ {} }};", READ_PERMISSION);
        let expected = read_clauses(&lf).unwrap();
        assert_eq!(read_clauses(&crlf).unwrap(), expected);
        assert_eq!(read_clauses(&mixed).unwrap(), expected);
        assert_eq!(read_clauses(&one_line).unwrap(), expected);
    }

    #[test]
    fn test_comments() {
        let header = format!("/* TEST COMMENT */\ngrant {{\n\t{}\n}};\n", READ_PERMISSION);
        assert_eq!(single(&header).permissions, vec![read_perm()]);

        let trailing = format!("grant {{\n\t{} // comment\n}};\n", READ_PERMISSION);
        assert_eq!(single(&trailing).permissions, vec![read_perm()]);

        let blocked_permission = format!("grant {{\n\t/*{}*/\n}};\n", READ_PERMISSION);
        assert!(single(&blocked_permission).permissions.is_empty());

        let commented_line = format!("grant {{\n\t//{}\n}};\n", READ_PERMISSION);
        assert!(single(&commented_line).permissions.is_empty());

        let blocked_policy = format!("/*grant {{\n\t{}\n}};\n*/\n", READ_PERMISSION);
        assert!(read_clauses(&blocked_policy).unwrap().is_empty());

        assert!(read_clauses("/* TEST COMMENT */\n").unwrap().is_empty());
    }

    #[test]
    fn test_multiple_permissions() {
        let separate = format!("grant {{\n\t{}\n\t{}\n}};\n", READ_PERMISSION, WRITE_PERMISSION);
        let same_line = format!("grant {{\n\t{} {}\n}};\n", READ_PERMISSION, WRITE_PERMISSION);
        assert_eq!(single(&separate).permissions, vec![read_perm(), write_perm()]);
        assert_eq!(single(&same_line).permissions, vec![read_perm(), write_perm()]);
    }

    #[test]
    fn test_scoped_grant() {
        let text = "grant signedBy \"someCA\", codeBase \"http://example.com\", \
                    principal javax.security.auth.x500.X500Principal \"cn=Duke\" {\n\
                    permission java.awt.AWTPermission \"accessClipboard\";\n};";
        let clause = single(text);
        assert_eq!(clause.signed_by.as_deref(), Some("someCA"));
        assert_eq!(clause.codebase.as_deref(), Some("http://example.com"));
        assert_eq!(clause.principals.len(), 1);
        assert_eq!(
            clause.principals.iter().next().unwrap(),
            &PrincipalEntry::new("javax.security.auth.x500.X500Principal", "cn=Duke")
        );
        assert_eq!(
            clause.permissions,
            vec![PermissionDescriptor::new("java.awt.AWTPermission", "accessClipboard")]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let clause = single("GRANT CODEBASE \"http://example.com\" { PERMISSION a.B \"x\"; };");
        assert_eq!(clause.codebase.as_deref(), Some("http://example.com"));
        assert_eq!(clause.permissions, vec![PermissionDescriptor::new("a.B", "x")]);
    }

    #[test]
    fn test_missing_codebase_is_absent() {
        let clause = single("grant signedBy \"someCA\" { };");
        assert_eq!(clause.codebase, None);
        assert!(!clause.is_unscoped());
    }

    #[test]
    fn test_permission_forms() {
        let text = "grant {\n\
                    permission java.security.AllPermission;\n\
                    permission a.B \"t\", signedBy \"signer\";\n\
                    permission a.C \"t\", \"read\", signedBy \"signer\";\n\
                    };";
        let clause = single(text);
        assert_eq!(
            clause.permissions,
            vec![
                PermissionDescriptor::new("java.security.AllPermission", ""),
                PermissionDescriptor::new("a.B", "t").signed_by("signer"),
                PermissionDescriptor::with_actions("a.C", "t", "read").signed_by("signer"),
            ]
        );
    }

    #[test]
    fn test_keystore_is_skipped() {
        let text = "keystore \"file:/keys\", \"jks\";\nkeystorePasswordURL \"file:/pw\";\ngrant { };";
        assert_eq!(read_clauses(text).unwrap().len(), 1);
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            read_clauses("grant { permission a.B \"x\" };"),
            Err(PolicyError::Parse { .. })
        ));
        assert!(matches!(
            read_clauses("grant {\npermission a.B \"x\";\n"),
            Err(PolicyError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            read_clauses("allow everything;"),
            Err(PolicyError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read_clauses("grant codeBase http://x { };"),
            Err(PolicyError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(read_clauses("").unwrap().is_empty());
        assert!(read_clauses("\n\r\n  \t").unwrap().is_empty());
    }
}
