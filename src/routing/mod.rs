//! Routing module
//!
//! Validates wiki request paths and extracts the action and page title.

mod matcher;

pub use matcher::{match_path, Action};
