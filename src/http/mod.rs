//! HTTP protocol layer module
//!
//! Response builders shared by the wiki handlers and the router.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_redirect_response, set_server_header,
};
