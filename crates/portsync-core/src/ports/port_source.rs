//! Port source port (driven/secondary port)
//!
//! Discovers the inbound port the VPN gateway currently forwards. The
//! source is built from configuration once and queried every cycle; it
//! never caches a port between calls.

use crate::domain::errors::DiscoveryError;

/// Port trait for forwarded-port discovery
///
/// ## Implementation Notes
///
/// - A port of `0` is valid data (nothing forwarded yet) and must be
///   returned as `Ok(0)`, not as an error.
/// - When several sources are consulted, a failure must preserve every
///   underlying cause (see [`DiscoveryError::Both`]).
#[async_trait::async_trait]
pub trait IPortSource: Send + Sync {
    /// Returns the currently forwarded port
    async fn resolve(&self) -> Result<u16, DiscoveryError>;
}
