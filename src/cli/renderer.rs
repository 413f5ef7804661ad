//! Policy Renderer - prints editor state as colored text or JSON
//!
//! Every view has a JSON form built as a `serde_json::Value`, so scripted
//! callers get the same information the colored output shows.

use serde_json::{json, Value};

use crate::core::PolicyResult;
use crate::editor::PolicyEditorController;
use crate::permissions::{all_categories, PermissionGroup};
use crate::policy::PolicyIdentifier;

use super::console::Console;

/// JSON view of one scope
pub fn scope_json(controller: &PolicyEditorController, identifier: &PolicyIdentifier) -> Value {
    let flags = controller.permissions(identifier);
    let granted: Vec<&str> = flags
        .iter()
        .filter(|(_, granted)| **granted)
        .map(|(p, _)| p.name())
        .collect();
    let groups: serde_json::Map<String, Value> = PermissionGroup::ALL
        .iter()
        .map(|g| (g.title().to_string(), json!(g.state(&flags))))
        .collect();

    json!({
        "identifier": identifier,
        "label": identifier.to_string(),
        "granted": granted,
        "groups": groups,
        "custom": controller.custom_permissions(identifier),
    })
}

/// JSON view of every scope in the file
pub fn identifiers_json(controller: &PolicyEditorController) -> Value {
    let scopes: Vec<Value> = controller
        .identifiers()
        .iter()
        .map(|id| scope_json(controller, id))
        .collect();
    json!({
        "file": controller.file().map(|p| p.display().to_string()),
        "scopes": scopes,
    })
}

/// JSON view of the category catalog
pub fn categories_json() -> Value {
    let categories: Vec<Value> = all_categories()
        .iter()
        .map(|p| {
            json!({
                "name": p.name(),
                "description": p.description(),
                "statement": p.to_permission_string(),
                "groups": PermissionGroup::of(*p).iter().map(|g| g.title()).collect::<Vec<_>>(),
            })
        })
        .collect();
    Value::Array(categories)
}

/// Prints editor views in the configured format
pub struct PolicyRenderer {
    console: Console,
    json: bool,
}

impl PolicyRenderer {
    pub fn new(json: bool) -> Self {
        Self {
            console: Console::new(),
            json,
        }
    }

    /// Create a renderer with a custom console
    pub fn with_console(console: Console, json: bool) -> Self {
        Self { console, json }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    fn print_json(&self, value: &Value) -> PolicyResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print every scope with its granted categories
    pub fn render_identifiers(&self, controller: &PolicyEditorController) -> PolicyResult<()> {
        if self.json {
            return self.print_json(&identifiers_json(controller));
        }

        let identifiers = controller.identifiers();
        if identifiers.is_empty() {
            self.console.print_system("No grant scopes in this policy file");
            return Ok(());
        }
        for identifier in &identifiers {
            self.console.print_identifier(identifier);
            let flags = controller.permissions(identifier);
            for (permission, _) in flags.iter().filter(|(_, granted)| **granted) {
                self.console.print_permission(*permission, true);
            }
            for custom in controller.custom_permissions(identifier) {
                self.console.print_custom(&custom);
            }
            self.console.println();
        }
        Ok(())
    }

    /// Print one scope in full, grouped the way the editor shows it
    pub fn render_scope(
        &self,
        controller: &PolicyEditorController,
        identifier: &PolicyIdentifier,
    ) -> PolicyResult<()> {
        if self.json {
            return self.print_json(&scope_json(controller, identifier));
        }

        let flags = controller.permissions(identifier);
        self.console.print_identifier(identifier);
        self.console.print_separator();
        for group in PermissionGroup::ALL {
            self.console.print_group(group.title(), group.state(&flags));
            for permission in group.permissions() {
                self.console.print_permission(*permission, flags[permission]);
            }
        }
        for (permission, granted) in flags.iter().filter(|(p, _)| !PermissionGroup::any_contains(**p)) {
            self.console.print_permission(*permission, *granted);
        }

        let custom = controller.custom_permissions(identifier);
        if !custom.is_empty() {
            self.console.print_separator();
            for permission in &custom {
                self.console.print_custom(permission);
            }
        }
        Ok(())
    }

    /// Print the category catalog
    pub fn render_categories(&self) -> PolicyResult<()> {
        if self.json {
            return self.print_json(&categories_json());
        }
        for permission in all_categories() {
            println!("{:<26} {}", permission.name(), permission.to_permission_string());
        }
        Ok(())
    }

    /// Report the outcome of a command that changed the file
    pub fn render_saved(&self, message: &str) -> PolicyResult<()> {
        if self.json {
            return self.print_json(&json!({ "status": "saved", "message": message }));
        }
        self.console.print_success(message);
        Ok(())
    }

    pub fn render_error(&self, error: &str) {
        if self.json {
            eprintln!("{}", json!({ "status": "error", "message": error }));
        } else {
            self.console.print_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{KnownPermission, PermissionDescriptor};

    fn controller() -> PolicyEditorController {
        let mut controller = PolicyEditorController::new();
        controller.set_permission(&PolicyIdentifier::AllCode, KnownPermission::ReadLocalFiles, true);
        controller.set_permission(&PolicyIdentifier::AllCode, KnownPermission::Clipboard, true);
        controller.add_custom_permission(
            &PolicyIdentifier::from_codebase("http://example.com"),
            PermissionDescriptor::new("a.B", "c"),
        );
        controller
    }

    #[test]
    fn test_scope_json() {
        let value = scope_json(&controller(), &PolicyIdentifier::AllCode);
        assert_eq!(value["label"], "All code");
        assert_eq!(value["identifier"], "all_code");
        assert_eq!(value["granted"], json!(["read-local-files", "clipboard"]));
        assert_eq!(value["custom"], json!([]));
        assert_eq!(value["groups"]["Read from file system"], json!("mixed"));
    }

    #[test]
    fn test_identifiers_json() {
        let value = identifiers_json(&controller());
        let scopes = value["scopes"].as_array().unwrap();
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0]["label"], "All code");
        assert_eq!(scopes[1]["identifier"]["scoped"]["codebase"], "http://example.com");
        assert_eq!(scopes[1]["custom"][0]["class_name"], "a.B");
        assert!(value["file"].is_null());
    }

    #[test]
    fn test_categories_json() {
        let value = categories_json();
        let categories = value.as_array().unwrap();
        assert_eq!(categories.len(), all_categories().len());
        assert_eq!(categories[0]["name"], "read-local-files");
    }
}
