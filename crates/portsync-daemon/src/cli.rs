//! Command line and environment parsing
//!
//! Every flag can also be set through an environment variable so the
//! daemon can be configured from a container definition alone.

use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};
use portsync_core::config::{Config, ConfigBuilder};

#[derive(Parser)]
#[command(
    name = "portsyncd",
    version,
    about = "Set qBittorrent's listening port to the port forwarded by the VPN gateway"
)]
pub struct Args {
    /// qBittorrent WebUI username
    #[arg(long, alias = "qbituser", env = "QBITUSER", default_value = "")]
    pub qbit_user: String,

    /// qBittorrent WebUI password
    #[arg(
        long,
        alias = "qbitpass",
        env = "QBITPASS",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub qbit_pass: String,

    /// Host to reach qBittorrent on, e.g. its container name
    #[arg(long, alias = "qbithost", env = "QBITHOST", default_value = "localhost")]
    pub qbit_host: String,

    /// Port to reach the qBittorrent WebUI on
    #[arg(long, alias = "qbitport", env = "QBITPORT", default_value_t = 8080)]
    pub qbit_port: u16,

    /// Host to reach the gateway control server on
    #[arg(long, alias = "gluetunhost", env = "GLUETUNHOST", default_value = "localhost")]
    pub gateway_host: String,

    /// Port of the gateway control server; 0 disables the API source
    #[arg(long, alias = "gluetunport", env = "GLUETUNPORT", default_value_t = 8000)]
    pub gateway_port: u16,

    /// File the gateway writes the forwarded port into
    #[arg(long, alias = "gluetunportfile", env = "GLUETUNPORTFILE")]
    pub gateway_port_file: Option<String>,

    /// Seconds between updates; 0 updates once and exits [default: 0]
    #[arg(long, env = "PORTSYNC_INTERVAL")]
    pub interval: Option<u64>,

    /// Interval read from the `GLUEBIT_INTERVAL` variable of older
    /// deployments; `--interval` wins when both are set
    #[arg(long = "gluebit-interval", env = "GLUEBIT_INTERVAL", hide = true)]
    pub legacy_interval: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "PORTSYNC_TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Login attempts before giving up
    #[arg(long, env = "PORTSYNC_LOGIN_ATTEMPTS", default_value_t = 20)]
    pub login_attempts: u32,

    /// Seconds between login attempts
    #[arg(long, env = "PORTSYNC_LOGIN_DELAY", default_value_t = 10)]
    pub login_delay: u64,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "PORTSYNC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Parses the process arguments and returns a validated configuration
    ///
    /// Exits with a usage error when the configuration is invalid.
    pub fn load() -> Config {
        Self::parse()
            .into_validated_config()
            .unwrap_or_else(|e| e.exit())
    }

    pub fn into_config(self) -> Config {
        let mut builder = ConfigBuilder::new()
            .qbit_host(self.qbit_host)
            .qbit_port(self.qbit_port)
            .qbit_credentials(self.qbit_user, self.qbit_pass)
            .qbit_timeout_ms(self.timeout_ms)
            .gateway_host(self.gateway_host)
            .gateway_port(self.gateway_port)
            .poll_interval(self.interval.or(self.legacy_interval).unwrap_or(0))
            .login_attempts(self.login_attempts)
            .login_delay(self.login_delay)
            .logging_level(self.log_level)
            .logging_json(self.log_json);

        if let Some(path) = self.gateway_port_file.filter(|p| !p.is_empty()) {
            builder = builder.gateway_port_file(PathBuf::from(path));
        }
        builder.build()
    }

    /// Converts to a [`Config`], reporting every validation error at once
    pub fn into_validated_config(self) -> Result<Config, clap::Error> {
        let config = self.into_config();
        let errors = config.validate();
        if errors.is_empty() {
            return Ok(config);
        }

        let message = errors
            .iter()
            .map(|e| format!("invalid config: {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        Err(Self::command().error(ErrorKind::ValueValidation, message))
    }
}
