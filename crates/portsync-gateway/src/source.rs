//! GatewayPortSource - IPortSource implementation for a VPN gateway
//!
//! Queries the gateway's HTTP control server first and falls back to the
//! port file. When both are configured and both fail, the returned
//! [`DiscoveryError::Both`] keeps each cause.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portsync_core::ports::IPortSource;
//! use portsync_gateway::GatewayPortSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = GatewayPortSource::new(
//!     Some("http://gluetun:8000".to_string()),
//!     Some("/tmp/gluetun/forwarded_port".into()),
//! );
//! let port = source.resolve().await?;
//! println!("forwarded port: {port}");
//! # Ok(())
//! # }
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use portsync_core::{
    config::Config,
    domain::{DiscoveryError, FetchError},
    ports::IPortSource,
};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::{decode_port, GATEWAY_TIMEOUT, PORT_FORWARDED_PATH};

/// Forwarded-port source backed by a gateway API and/or a port file
#[derive(Debug, Clone)]
pub struct GatewayPortSource {
    /// The underlying HTTP client
    client: Client,
    /// Gateway control server base URL, e.g. `http://gluetun:8000`
    gateway_url: Option<String>,
    /// Port file written by the gateway
    port_file: Option<PathBuf>,
    /// Timeout for the gateway query
    timeout: Duration,
}

impl GatewayPortSource {
    /// Creates a source from an optional gateway URL and an optional port file
    pub fn new(gateway_url: Option<String>, port_file: Option<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            gateway_url,
            port_file,
            timeout: GATEWAY_TIMEOUT,
        }
    }

    /// Creates a source from the gateway section of the configuration
    pub fn from_config(config: &Config) -> Self {
        let port_file = config
            .gateway
            .port_file
            .clone()
            .filter(|p| !p.as_os_str().is_empty());
        Self::new(config.gateway_url(), port_file)
    }

    /// Overrides the gateway query timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn gateway_url(&self) -> Option<&str> {
        self.gateway_url.as_deref()
    }

    pub fn port_file(&self) -> Option<&Path> {
        self.port_file.as_deref()
    }

    /// Queries `GET {base_url}/v1/openvpn/portforwarded`
    pub async fn fetch_from_gateway(&self, base_url: &str) -> Result<u16, FetchError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), PORT_FORWARDED_PATH);
        debug!(%url, "Querying gateway for forwarded port");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::transport(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadResponse {
                code: status.as_u16(),
                status: status.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(&e))?;
        decode_port(&body)
    }

    /// Reads the port from the gateway's port file
    ///
    /// A file that cannot be read is reported as a decode error.
    pub async fn read_port_file(path: &Path) -> Result<u16, FetchError> {
        debug!(path = %path.display(), "Reading forwarded port file");

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::Decode(format!("{}: {e}", path.display())))?;
        decode_port(&content)
    }
}

#[async_trait::async_trait]
impl IPortSource for GatewayPortSource {
    async fn resolve(&self) -> Result<u16, DiscoveryError> {
        let gateway_error = match &self.gateway_url {
            Some(url) => match self.fetch_from_gateway(url).await {
                Ok(port) => return Ok(port),
                Err(e) => Some(e),
            },
            None => None,
        };

        let Some(path) = &self.port_file else {
            return Err(match gateway_error {
                Some(e) => DiscoveryError::Gateway(e),
                None => DiscoveryError::NotConfigured,
            });
        };

        if let Some(e) = &gateway_error {
            warn!(error = %e, "Gateway query failed, falling back to port file");
        }

        match Self::read_port_file(path).await {
            Ok(port) => Ok(port),
            Err(file) => Err(match gateway_error {
                Some(gateway) => DiscoveryError::Both { gateway, file },
                None => DiscoveryError::File(file),
            }),
        }
    }
}
