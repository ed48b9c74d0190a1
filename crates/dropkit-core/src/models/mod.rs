//! Domain models

pub mod file;

pub use file::{FileDescriptor, ValidationOutcome};
