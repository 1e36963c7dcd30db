//! Actor system configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```
//! use strand_actor::ActorSystemConfig;
//!
//! let config = ActorSystemConfig::from_toml_str("cache_warning_threshold = 8").unwrap();
//! assert_eq!(config.cache_warning_threshold, 8);
//! assert_eq!(config.thread_name_prefix, "strand-actor");
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use strand_core::{Error, Result};

/// Configuration for an [`ActorSystem`](crate::ActorSystem).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActorSystemConfig {
    /// Prefix for the names of spawned actor threads
    pub thread_name_prefix: String,
    /// Retry-cache length at which a warning is logged
    pub cache_warning_threshold: usize,
    /// Debug name given to scoped actors
    pub scoped_actor_name: String,
}

impl Default for ActorSystemConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "strand-actor".to_string(),
            cache_warning_threshold: 1024,
            scoped_actor_name: "scoped".to_string(),
        }
    }
}

impl ActorSystemConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
