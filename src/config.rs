// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration options

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default capacity of the compiled-pattern cache
pub const DEFAULT_PATTERN_CACHE_SIZE: usize = 256;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the evaluation engine and the stock environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of compiled string patterns kept per environment (0 disables caching)
    pub pattern_cache_size: usize,

    /// Whether to log each resolved overload at debug level
    pub log_resolution: bool,

    /// Whether new environments pre-register the standard annotation-key names
    pub register_default_keys: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pattern_cache_size: DEFAULT_PATTERN_CACHE_SIZE,
            log_resolution: false,
            register_default_keys: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with custom settings
    pub fn new(pattern_cache_size: usize, log_resolution: bool, register_default_keys: bool) -> Self {
        Self {
            pattern_cache_size,
            log_resolution,
            register_default_keys,
        }
    }

    /// Configuration suited for tests: small cache, resolution logging on
    pub fn testing() -> Self {
        Self {
            pattern_cache_size: 8,
            log_resolution: true,
            register_default_keys: true,
        }
    }

    /// Configuration with pattern caching disabled
    pub fn no_cache() -> Self {
        Self {
            pattern_cache_size: 0,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check if pattern caching is enabled
    pub fn is_cache_enabled(&self) -> bool {
        self.pattern_cache_size > 0
    }
}
