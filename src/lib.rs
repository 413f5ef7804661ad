pub mod core;
pub mod permissions;

// Policy file text <-> grant clause records
pub mod parser;

// Editable model of one policy file
pub mod policy;

// Session facade driven by front ends
pub mod editor;

// Ambient setup for the binary
pub mod config;
pub mod logging;

// Terminal rendering
pub mod cli;
