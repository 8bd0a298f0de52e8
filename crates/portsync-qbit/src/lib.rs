//! portsync qBit - qBittorrent WebUI API client
//!
//! Provides an async, cookie-authenticated session for:
//! - Logging in to the WebUI
//! - Reading the application preferences
//! - Writing the application preferences back
//!
//! ## Modules
//!
//! - [`session`] - [`QbitSession`], the `IControlSession` adapter

pub mod session;

use std::time::Duration;

pub use session::QbitSession;

/// Path prefix of the WebUI API, appended to the configured base URL
pub const API_PREFIX: &str = "api/v2/";

/// Body qBittorrent answers a successful login with
pub const LOGIN_OK_BODY: &str = "Ok.";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
