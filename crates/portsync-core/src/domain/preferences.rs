//! qBittorrent application preferences
//!
//! Only the listening-port fields are typed; every other key in the
//! document is kept verbatim so that writing the preferences back never
//! drops or rewrites settings this crate does not know about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The preference document served by `app/preferences`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Port qBittorrent listens on for incoming peer connections
    pub listen_port: u16,

    /// Whether qBittorrent picks a random port on every start
    #[serde(default)]
    pub random_port: bool,

    /// All remaining keys, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Preferences {
    /// Creates preferences with only the listening port set
    pub fn with_listen_port(listen_port: u16) -> Self {
        Self {
            listen_port,
            ..Self::default()
        }
    }

    /// Pins the listening port to `port` and disables port randomisation
    pub fn pin_listen_port(&mut self, port: u16) {
        self.listen_port = port;
        self.random_port = false;
    }
}
