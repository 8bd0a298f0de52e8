//! Domain types
//!
//! - [`errors`] - failure taxonomy for fetches, discovery, the control API and a whole cycle
//! - [`preferences`] - the qBittorrent preference document with opaque pass-through fields

pub mod errors;
pub mod preferences;

pub use errors::{ClientError, CycleError, DiscoveryError, FetchError};
pub use preferences::Preferences;
