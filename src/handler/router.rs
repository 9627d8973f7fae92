//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for body limits,
//! method validation, path validation and dispatching to the page handlers.

use crate::config::AppState;
use crate::error::WikiError;
use crate::handler::pages;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, Action};
use crate::wiki::Title;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::{HeaderMap, Method, Request, Response};
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const READ_METHODS: &str = "GET, HEAD";
const SAVE_METHODS: &str = "POST";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub content_type: Option<&'a str>,
    /// Fully buffered request body
    pub body: Bytes,
}

impl RequestContext<'_> {
    pub fn is_head(&self) -> bool {
        *self.method == Method::HEAD
    }

    /// Whether the body should be decoded as `application/x-www-form-urlencoded`
    pub fn has_form_body(&self) -> bool {
        if self.body.is_empty() {
            return false;
        }
        self.content_type.map_or(true, |ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let mut access = state.config.logging.access_log.then(|| {
        let mut entry = AccessLogEntry::new(
            peer_addr.to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = format_version(parts.version);
        entry.referer = header_str(&parts.headers, "referer").map(ToString::to_string);
        entry.user_agent = header_str(&parts.headers, "user-agent").map(ToString::to_string);
        entry
    });

    let max_body_size = state.config.http.max_body_size;
    let mut response = match check_body_size(&parts.headers, max_body_size) {
        Some(resp) => resp,
        None => match read_body(body, max_body_size).await {
            Ok(body) => {
                let ctx = RequestContext {
                    method: &parts.method,
                    path: parts.uri.path(),
                    query: parts.uri.query(),
                    content_type: header_str(&parts.headers, "content-type"),
                    body,
                };
                route_request(&ctx, &state).await
            }
            Err(resp) => resp,
        },
    };

    http::set_server_header(&mut response, &state.config.http.server_name);

    if let Some(entry) = access.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.elapsed = started.elapsed();
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a buffered request to its page handler
///
/// `/` is the front page. Every other path is percent-decoded and must pass
/// the validator, which rejects with 404 before any handler runs.
pub async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let path = decode_path(ctx.path);
    if path == "/" {
        if let Some(resp) = check_read_method(ctx.method) {
            return resp;
        }
        return pages::front_page(state, ctx.is_head())
            .await
            .unwrap_or_else(WikiError::into_response);
    }

    let Some((action, raw_title)) = routing::match_path(&path) else {
        return http::build_404_response();
    };
    let Ok(title) = Title::parse(raw_title) else {
        return http::build_404_response();
    };

    let method_check = match action {
        Action::View | Action::Edit => check_read_method(ctx.method),
        Action::Save => check_save_method(ctx.method, state.config.wiki.save_requires_post),
    };
    if let Some(resp) = method_check {
        return resp;
    }

    let result = match action {
        Action::View => pages::view(state, title, ctx.is_head()).await,
        Action::Edit => pages::edit(state, title, ctx.is_head()).await,
        Action::Save => pages::save(state, title, ctx).await,
    };

    result.unwrap_or_else(WikiError::into_response)
}

/// Pages are read with GET or HEAD only
fn check_read_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(READ_METHODS))
        }
    }
}

/// Saves must be POSTed unless the restriction is switched off
fn check_save_method(method: &Method, requires_post: bool) -> Option<Response<Full<Bytes>>> {
    if !requires_post || *method == Method::POST {
        return None;
    }
    logger::log_warning(&format!("Method not allowed for save: {method}"));
    Some(http::build_405_response(SAVE_METHODS))
}

/// Reject early on an oversized Content-Length
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size_str = header_str(headers, "content-length")?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Buffer the request body, enforcing the size limit for chunked uploads too
async fn read_body(body: Incoming, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>> {
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(err) => {
            logger::log_warning(&format!("Failed to read request body: {err}"));
            Err(http::build_400_response("failed to read request body"))
        }
    }
}

/// Percent-decode the request path. Undecodable paths are kept raw, which
/// the validator then rejects.
fn decode_path(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn format_version(version: hyper::Version) -> String {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string()
}
