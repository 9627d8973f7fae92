//! Wiki page handlers
//!
//! Each handler owns a transient `Page`, talks to the store and either
//! renders a template or redirects. Errors bubble up as `WikiError` and are
//! turned into responses by the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::error::WikiError;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use crate::routing::Action;
use crate::wiki::{template, Page, StoreError, Title};

type HandlerResult = Result<Response<Full<Bytes>>, WikiError>;

/// Form field carrying the page text
const BODY_FIELD: &str = "body";

/// `/view/{title}`: render the page, or send the client to the editor if it
/// cannot be loaded
pub async fn view(state: &AppState, title: Title, is_head: bool) -> HandlerResult {
    match state.store.load(&title).await {
        Ok(page) => render(state, template::VIEW, &page, is_head),
        Err(err) => {
            log_load_failure(&title, &err);
            Ok(http::build_redirect_response(&Action::Edit.path_for(title.as_str())))
        }
    }
}

/// `/edit/{title}`: render the edit form, empty when nothing is saved yet
pub async fn edit(state: &AppState, title: Title, is_head: bool) -> HandlerResult {
    let page = load_or_placeholder(state, title).await;
    render(state, template::EDIT, &page, is_head)
}

/// `/save/{title}`: overwrite the page with the submitted `body` field
pub async fn save(state: &AppState, title: Title, ctx: &RequestContext<'_>) -> HandlerResult {
    let body = form_body(ctx)?;
    let page = Page::new(title, body);
    state.store.save(&page).await?;
    logger::log_page_saved(page.title.as_str(), page.body.len());
    Ok(http::build_redirect_response(&Action::View.path_for(page.title.as_str())))
}

/// `/`: the configured front page rendered with the view template
pub async fn front_page(state: &AppState, is_head: bool) -> HandlerResult {
    let page = load_or_placeholder(state, state.front_page.clone()).await;
    render(state, template::VIEW, &page, is_head)
}

async fn load_or_placeholder(state: &AppState, title: Title) -> Page {
    match state.store.load(&title).await {
        Ok(page) => page,
        Err(err) => {
            log_load_failure(&title, &err);
            Page::placeholder(title)
        }
    }
}

fn render(state: &AppState, name: &str, page: &Page, is_head: bool) -> HandlerResult {
    let html = state.templates.render(name, page)?;
    Ok(http::build_html_response(html, is_head))
}

fn log_load_failure(title: &Title, err: &StoreError) {
    if err.is_not_found() {
        logger::log_page_missing(title.as_str());
    } else {
        logger::log_warning(&format!("Failed to load page {title}: {err}"));
    }
}

/// Read the `body` form field. The urlencoded request body wins over the
/// query string, the first occurrence wins within each, and a missing field
/// is an empty page.
fn form_body(ctx: &RequestContext<'_>) -> Result<String, WikiError> {
    if ctx.has_form_body() {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&ctx.body)?;
        if let Some(body) = first_body(pairs) {
            return Ok(body);
        }
    }

    if let Some(query) = ctx.query {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        if let Some(body) = first_body(pairs) {
            return Ok(body);
        }
    }

    Ok(String::new())
}

fn first_body(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find_map(|(key, value)| (key == BODY_FIELD).then_some(value))
}
