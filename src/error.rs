use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use thiserror::Error;

use crate::http;
use crate::wiki::{RenderError, StoreError};

/// Failure while serving a single request. The raw message of the
/// underlying error is passed through to the client.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("malformed form data: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

impl WikiError {
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::Form(err) => {
                crate::logger::log_warning(&format!("Rejected form body: {err}"));
                http::build_400_response(&format!("malformed form data: {err}"))
            }
            Self::Store(err) => {
                crate::logger::log_error(&format!("Page store failure: {err}"));
                http::build_500_response(&err.to_string())
            }
            Self::Render(err) => {
                crate::logger::log_error(&format!("Template failure: {err}"));
                http::build_500_response(&err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_failure_is_500() {
        let err = WikiError::from(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        )));
        assert_eq!(err.into_response().status(), 500);
    }
}
