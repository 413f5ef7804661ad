pub mod error;

pub use error::{PolicyError, PolicyResult};
