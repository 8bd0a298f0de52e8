//! Port definitions (hexagonal architecture interfaces)
//!
//! The reconcile use case depends only on these traits; the HTTP and file
//! implementations live in the adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IPortSource`] - discovers the port forwarded by the VPN gateway
//! - [`IControlSession`] - reads and writes qBittorrent preferences

pub mod control_session;
pub mod port_source;

pub use control_session::IControlSession;
pub use port_source::IPortSource;
