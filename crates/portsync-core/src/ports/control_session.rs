//! Control session port (driven/secondary port)
//!
//! An authenticated session with the torrent application's control API.
//! The session owns its authentication state; `login` is the only
//! operation that changes it, which is why it alone takes `&mut self`.

use crate::domain::{errors::ClientError, preferences::Preferences};

/// Port trait for the torrent application's control API
///
/// ## Implementation Notes
///
/// - A login rejected by the server must be reported as
///   [`ClientError::LoginFailed`], never as a transport error, because
///   callers treat it as non-retryable.
/// - Every request must be bounded by a timeout.
#[async_trait::async_trait]
pub trait IControlSession: Send + Sync {
    /// Authenticates and stores the session cookies for later requests
    async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError>;

    /// Fetches the current application preferences
    async fn get_preferences(&self) -> Result<Preferences, ClientError>;

    /// Writes the full preference document back
    async fn set_preferences(&self, preferences: &Preferences) -> Result<(), ClientError>;
}
