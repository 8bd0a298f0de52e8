//! Configuration module for portsync.
//!
//! Provides typed configuration structs filled in by the daemon's command
//! line and environment parsing, with validation, defaults, and a builder
//! pattern for programmatic use.

use std::{fmt, path::PathBuf, time::Duration};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for portsync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub qbit: QbitConfig,
    pub gateway: GatewayConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// qBittorrent WebUI connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct QbitConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// VPN gateway settings. Either the HTTP API (host and port) or the port
/// file must be usable; both may be set, in which case the file is the
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    /// Gateway control server port. `0` disables the HTTP API source.
    pub port: u16,
    /// File the gateway writes the forwarded port into.
    pub port_file: Option<PathBuf>,
}

/// Reconciliation loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Seconds between reconciliation cycles. `0` runs a single cycle.
    pub poll_interval: u64,
    /// Login attempts before the first cycle gives up.
    pub login_attempts: u32,
    /// Seconds to wait between login attempts.
    pub login_delay: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

impl Config {
    /// Base URL of the qBittorrent WebUI.
    pub fn qbit_url(&self) -> String {
        format!("http://{}:{}", self.qbit.host, self.qbit.port)
    }

    /// Base URL of the gateway control server, or `None` when the HTTP API
    /// source is disabled.
    pub fn gateway_url(&self) -> Option<String> {
        self.gateway
            .api_enabled()
            .then(|| format!("http://{}:{}", self.gateway.host, self.gateway.port))
    }

    /// Whether the agent reconciles once and exits.
    pub fn is_single_shot(&self) -> bool {
        self.sync.poll_interval == 0
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sync.poll_interval)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_secs(self.sync.login_delay)
    }
}

impl QbitConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl GatewayConfig {
    /// Whether the HTTP API source is configured.
    pub fn api_enabled(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }
}

// The password must never reach the logs.
impl fmt::Debug for QbitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QbitConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for QbitConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            username: String::new(),
            password: String::new(),
            timeout_ms: 1000,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            port_file: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: 0,
            login_attempts: 20,
            login_delay: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"qbit.host"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- qbit ---
        if self.qbit.host.is_empty() {
            errors.push(ValidationError {
                field: "qbit.host".into(),
                message: "must not be empty".into(),
            });
        }
        if self.qbit.port == 0 {
            errors.push(ValidationError {
                field: "qbit.port".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.qbit.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "qbit.timeout_ms".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- gateway ---
        let has_port_file = self
            .gateway
            .port_file
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if !self.gateway.api_enabled() && !has_port_file {
            errors.push(ValidationError {
                field: "gateway".into(),
                message: "either host and port or port_file must be set".into(),
            });
        }

        // --- sync ---
        if self.sync.login_attempts == 0 {
            errors.push(ValidationError {
                field: "sync.login_attempts".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use portsync_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .qbit_host("qbittorrent")
///     .gateway_host("gluetun")
///     .poll_interval(60)
///     .build();
/// assert_eq!(config.qbit_url(), "http://qbittorrent:8080");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self::default()
    }

    // --- qbit ---

    pub fn qbit_host(mut self, host: impl Into<String>) -> Self {
        self.config.qbit.host = host.into();
        self
    }

    pub fn qbit_port(mut self, port: u16) -> Self {
        self.config.qbit.port = port;
        self
    }

    pub fn qbit_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.qbit.username = username.into();
        self.config.qbit.password = password.into();
        self
    }

    pub fn qbit_timeout_ms(mut self, ms: u64) -> Self {
        self.config.qbit.timeout_ms = ms;
        self
    }

    // --- gateway ---

    pub fn gateway_host(mut self, host: impl Into<String>) -> Self {
        self.config.gateway.host = host.into();
        self
    }

    pub fn gateway_port(mut self, port: u16) -> Self {
        self.config.gateway.port = port;
        self
    }

    pub fn gateway_port_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.gateway.port_file = Some(path.into());
        self
    }

    // --- sync ---

    pub fn poll_interval(mut self, seconds: u64) -> Self {
        self.config.sync.poll_interval = seconds;
        self
    }

    pub fn login_attempts(mut self, attempts: u32) -> Self {
        self.config.sync.login_attempts = attempts;
        self
    }

    pub fn login_delay(mut self, seconds: u64) -> Self {
        self.config.sync.login_delay = seconds;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_json(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    /// Consume the builder and return the [`Config`] without validation.
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the [`Config`] or the
    /// list of validation errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}
