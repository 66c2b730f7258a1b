//! Configuration for NestKV
//!
//! Centralized configuration with sensible defaults.

use crate::error::{NestError, Result};

/// Main configuration for a NestKV store and its session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Read Configuration
    // -------------------------------------------------------------------------
    /// Value reported by `get_or_sentinel` for an absent key
    pub missing_sentinel: i64,

    /// Answer GET misses in the session with `missing_sentinel`
    /// instead of `(nil)`
    pub sentinel_replies: bool,

    // -------------------------------------------------------------------------
    // Transaction Configuration
    // -------------------------------------------------------------------------
    /// Maximum nesting depth of open transactions (`None` = unbounded).
    /// Depth 1 is a transaction begun directly on the root.
    pub max_depth: Option<usize>,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// Emit `OK` acknowledgements for commands with no payload
    pub echo_acks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            missing_sentinel: -1,
            sentinel_replies: false,
            max_depth: None,
            echo_acks: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings no store can honor
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(NestError::Config(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the sentinel returned for missing keys
    ///
    /// Session GET replies switch to the sentinel as well.
    pub fn missing_sentinel(mut self, value: i64) -> Self {
        self.config.missing_sentinel = value;
        self.config.sentinel_replies = true;
        self
    }

    /// Limit how deeply transactions may nest
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Toggle `OK` acknowledgements in the session
    pub fn echo_acks(mut self, enabled: bool) -> Self {
        self.config.echo_acks = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
