//! Reconcile use case
//!
//! A single deterministic read-compare-write pass: resolve the forwarded
//! port, read qBittorrent's preferences, and write them back only when the
//! listening port differs. Retrying is the scheduler's job, not this one's.

use tracing::{debug, info};

use crate::{
    domain::errors::CycleError,
    ports::{IControlSession, IPortSource},
};

/// Result of a successful reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The listening port already matched the forwarded port
    AlreadyInSync {
        /// The forwarded (and current) port
        port: u16,
    },
    /// The listening port was changed
    Updated {
        /// Listening port before the update
        previous: u16,
        /// Listening port after the update
        port: u16,
    },
}

/// Runs one reconciliation pass
///
/// # Errors
///
/// - Discovery failures are returned before the session is touched.
/// - Preference read or write failures are returned unchanged.
pub async fn reconcile(
    source: &dyn IPortSource,
    session: &dyn IControlSession,
) -> Result<ReconcileOutcome, CycleError> {
    let port = source.resolve().await?;
    debug!(port, "Got forwarded port from gateway");

    let mut preferences = session.get_preferences().await?;
    if preferences.listen_port == port {
        info!(port, "Listening port already in sync");
        return Ok(ReconcileOutcome::AlreadyInSync { port });
    }

    let previous = preferences.listen_port;
    preferences.pin_listen_port(port);
    session.set_preferences(&preferences).await?;

    info!(previous, port, "Updated qBittorrent listening port");
    Ok(ReconcileOutcome::Updated { previous, port })
}
