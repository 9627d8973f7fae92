//! Logger module
//!
//! Thin facade over `tracing` so call sites stay one line:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup.
pub fn init(config: &Config) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, data_dir: &Path) {
    tracing::info!("======================================");
    tracing::info!("Wiki server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!("Page directory: {}", data_dir.display());
    tracing::info!("Template directory: {}", config.wiki.template_dir);
    tracing::info!("Front page: {}", config.wiki.front_page);
    tracing::info!("======================================");
}

/// Saving by GET leaves page writes open to cross-site links
pub fn log_save_method_unrestricted() {
    tracing::warn!(
        "wiki.save_requires_post is off: /save/{{title}} accepts any HTTP method, \
         so a plain link or image tag can overwrite pages"
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_page_saved(title: &str, size: usize) {
    tracing::info!(title, size, "page saved");
}

pub fn log_page_missing(title: &str) {
    tracing::debug!(title, "page not found on disk");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!("{signal} received, shutting down");
}

pub fn log_shutdown_complete(in_flight: usize) {
    tracing::info!("Listener closed, {in_flight} connection(s) still finishing");
}
