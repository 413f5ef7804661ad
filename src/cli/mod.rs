//! Terminal front end helpers for the `policyedit` binary

mod console;
mod renderer;

pub use console::Console;
pub use renderer::{categories_json, identifiers_json, scope_json, PolicyRenderer};
