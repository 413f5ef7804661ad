//! Editing session facade used by front ends

mod controller;

pub use controller::{identifier_from_codebase, validate_codebase, PolicyEditorController};
