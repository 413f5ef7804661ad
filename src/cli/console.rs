use colored::*;
use std::io::{self, Write};

use crate::permissions::{GroupState, KnownPermission, PermissionDescriptor};
use crate::policy::PolicyIdentifier;

/// Terminal output for the policy editor with colored formatting
pub struct Console {
    heading_color: Color,
    granted_color: Color,
    custom_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            heading_color: Color::Cyan,
            granted_color: Color::Green,
            custom_color: Color::Magenta,
        }
    }

    /// Create a new Console with custom colors
    pub fn with_colors(heading_color: Color, granted_color: Color, custom_color: Color) -> Self {
        Self {
            heading_color,
            granted_color,
            custom_color,
        }
    }

    /// Print a scope heading
    pub fn print_identifier(&self, identifier: &PolicyIdentifier) {
        let label = if identifier.is_all_code() {
            identifier.to_string().color(self.heading_color).bold().italic()
        } else {
            identifier.to_string().color(self.heading_color).bold()
        };
        println!("{} {}", "Scope:".color(self.heading_color), label);
    }

    /// Print one category with a check box
    pub fn print_permission(&self, permission: KnownPermission, granted: bool) {
        if granted {
            println!(
                "  {} {:<26} {}",
                "[x]".color(self.granted_color).bold(),
                permission.name().color(self.granted_color),
                permission.description()
            );
        } else {
            println!(
                "  {} {:<26} {}",
                "[ ]".bright_black(),
                permission.name().bright_black(),
                permission.description().bright_black()
            );
        }
    }

    /// Print a group heading with its tri-state marker
    pub fn print_group(&self, title: &str, state: GroupState) {
        let marker = match state {
            GroupState::All => "[x]".color(self.granted_color).bold(),
            GroupState::Mixed => "[~]".yellow().bold(),
            GroupState::None => "[ ]".bright_black(),
        };
        println!("{} {}", marker, title.bold());
    }

    /// Print a permission outside the catalog
    pub fn print_custom(&self, permission: &PermissionDescriptor) {
        println!(
            "  {} {}",
            "custom".color(self.custom_color).bold(),
            permission.to_permission_string()
        );
    }

    /// Print a newline
    pub fn println(&self) {
        println!();
    }

    /// Print a system message (info, notices)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print a success message
    pub fn print_success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Print a separator line
    pub fn print_separator(&self) {
        println!("{}", "-".repeat(60).bright_black());
    }

    /// Ask a yes/no question on stdin; anything but `y`/`yes` is no
    pub fn confirm(&self, question: &str) -> io::Result<bool> {
        print!("{} {} ", question.yellow().bold(), "[y/N]".bright_black());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
