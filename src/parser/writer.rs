//! Grant clause writer
//!
//! Renders clause records back to policy text that `read_clauses` reads into
//! the same records.

use chrono::Local;

use super::lexer::is_word_char;
use super::GrantClause;
use crate::permissions::PermissionDescriptor;

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Class names are written bare unless they contain non-word characters
fn name(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_word_char) {
        value.to_string()
    } else {
        quote(value)
    }
}

fn grant_header(clause: &GrantClause) -> String {
    let mut parts = Vec::new();
    if let Some(signer) = &clause.signed_by {
        parts.push(format!("signedBy {}", quote(signer)));
    }
    if let Some(codebase) = &clause.codebase {
        parts.push(format!("codeBase {}", quote(codebase)));
    }
    for principal in &clause.principals {
        parts.push(format!(
            "principal {} {}",
            name(&principal.principal_class),
            quote(&principal.principal_name)
        ));
    }

    if parts.is_empty() {
        "grant {".to_string()
    } else {
        format!("grant {} {{", parts.join(", "))
    }
}

fn permission_line(permission: &PermissionDescriptor) -> String {
    let mut line = format!("permission {}", name(&permission.class_name));
    if !permission.target.is_empty() || permission.has_actions() {
        line.push(' ');
        line.push_str(&quote(&permission.target));
    }
    if permission.has_actions() {
        line.push_str(", ");
        line.push_str(&quote(&permission.actions));
    }
    if let Some(signer) = &permission.signed_by {
        line.push_str(", signedBy ");
        line.push_str(&quote(signer));
    }
    line.push(';');
    line
}

/// Render clauses as policy text, preceded by a generated-file header
pub fn write_clauses(clauses: &[GrantClause]) -> String {
    let mut lines = vec![
        format!(
            "/* AUTOMATICALLY GENERATED ON {} */",
            Local::now().format("%a %b %e %H:%M:%S %Z %Y")
        ),
        "/* DO NOT EDIT */".to_string(),
        String::new(),
    ];

    for clause in clauses {
        lines.push(grant_header(clause));
        lines.extend(
            clause
                .permissions
                .iter()
                .map(|permission| format!("\t{}", permission_line(permission))),
        );
        lines.push("};".to_string());
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
