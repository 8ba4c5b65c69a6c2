//! Static configuration.
//!
//! Both structures are plain values that firmware usually builds as
//! constants, but they can also be provisioned as JSON (for example from a
//! flash partition) through [`serde-json-core`](serde_json_core):
//!
//! ```rust
//! use ethttp::config::NetworkConfig;
//!
//! let config = NetworkConfig::from_json(
//!     r#"{"mac":[2,0,0,0,0,1],"ip":[192,168,1,50],"port":8080}"#,
//! ).unwrap();
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.ip, Some([192, 168, 1, 50]));
//! ```

use crate::network::application::http::{LineEnding, ParserConfig};
use serde::Deserialize;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for the target structure.
    Parse,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Parse => defmt::write!(f, "Parse"),
        }
    }
}

/// Network identity handed to the interface bring-up code.
///
/// The engine itself never reads this; it exists so the whole device setup
/// lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Hardware (MAC) address of the interface.
    pub mac: [u8; 6],
    /// Fixed IPv4 address; `None` asks for DHCP.
    pub ip: Option<[u8; 4]>,
    /// TCP port the listener is bound to.
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mac: [0xDE, 0xAD, 0xBE, 0xEF, 0xFE, 0xED],
            ip: None,
            port: 80,
        }
    }
}

impl NetworkConfig {
    /// Load from a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json_core::from_str(json)
            .map(|(config, _)| config)
            .map_err(|_| ConfigError::Parse)
    }

    /// Whether the interface should ask for an address over DHCP.
    pub fn uses_dhcp(&self) -> bool {
        self.ip.is_none()
    }
}

/// Behaviour of the HTTP engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Request parsing options.
    pub parser: ParserConfig,
    /// Emit handler headers in responses.
    pub header_support: bool,
    /// Line terminator for responses.
    pub line_ending: LineEnding,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            header_support: true,
            line_ending: LineEnding::Lf,
        }
    }
}

impl ServerConfig {
    /// Load from a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json_core::from_str(json)
            .map(|(config, _)| config)
            .map_err(|_| ConfigError::Parse)
    }
}
