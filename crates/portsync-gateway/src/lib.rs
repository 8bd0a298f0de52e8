//! portsync Gateway - forwarded port discovery
//!
//! Resolves the inbound port a VPN gateway (such as gluetun) has obtained,
//! either from its HTTP control server or from the port file it writes to
//! a shared volume.
//!
//! ## Modules
//!
//! - [`source`] - [`GatewayPortSource`], the `IPortSource` adapter with file fallback

pub mod source;

use std::time::Duration;

use portsync_core::domain::FetchError;
use serde::Deserialize;

pub use source::GatewayPortSource;

/// Gateway control server endpoint reporting the forwarded port
pub const PORT_FORWARDED_PATH: &str = "/v1/openvpn/portforwarded";

/// Fixed timeout for the gateway query
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(1);

/// `{"port": N}` document served by the gateway and stored in the port file
#[derive(Debug, Deserialize)]
struct PortPayload {
    port: u16,
}

/// Decodes a `{"port": N}` document
///
/// A missing or non-integer `port` field is a decode error.
pub fn decode_port(bytes: &[u8]) -> Result<u16, FetchError> {
    serde_json::from_slice::<PortPayload>(bytes)
        .map(|payload| payload.port)
        .map_err(|e| FetchError::Decode(e.to_string()))
}
