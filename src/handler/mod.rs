//! Request handler module
//!
//! Responsible for request routing dispatch and the wiki page handlers.

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
