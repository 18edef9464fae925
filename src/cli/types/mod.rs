//! Type-safe wrappers shared by the CLI, HTTP parameters and storage.

pub mod position;
pub mod time;
