// Server loop module
// Accepts connections until shutdown is requested, then lets in-flight requests drain

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// How often the drain loop re-checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main accept loop
///
/// Runs until `signals.shutdown` fires. The listener is closed immediately;
/// open connections get up to the connection timeout to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    while !signals.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown_complete(active_connections.load(Ordering::SeqCst));

    let remaining = drain_connections(&active_connections, state.config.connection_timeout()).await;
    if remaining > 0 {
        logger::log_warning(&format!(
            "{remaining} connection(s) still open after drain deadline, exiting anyway"
        ));
    }
    Ok(())
}

/// Wait for the active connection count to reach zero, up to `deadline`.
/// Returns the number of connections still open.
async fn drain_connections(active: &AtomicUsize, deadline: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + deadline;

    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        let remaining = drain_connections(&active, Duration::from_secs(30)).await;
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let active = AtomicUsize::new(2);
        let remaining = drain_connections(&active, Duration::from_millis(200)).await;
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_drain_waits_for_connections() {
        let active = Arc::new(AtomicUsize::new(1));
        let finisher = Arc::clone(&active);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            finisher.fetch_sub(1, Ordering::SeqCst);
        });

        let remaining = drain_connections(&active, Duration::from_secs(5)).await;
        assert_eq!(remaining, 0);
    }
}
