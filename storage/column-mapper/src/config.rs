// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error accessing {0}: {1}")]
    IO(String, #[source] std::io::Error),
    #[error("Error (de)serializing {0}: {1}")]
    Yaml(String, #[source] serde_yaml::Error),
}

/// Resolution of the timestamps stamped on marshalled columns.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPrecision {
    #[default]
    Micros,
    Millis,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    pub timestamp_precision: TimestampPrecision,
    /// Reject rows whose keyspace or family differs from the target type's.
    pub verify_family_on_read: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            timestamp_precision: TimestampPrecision::Micros,
            verify_family_on_read: true,
        }
    }
}

impl MapperConfig {
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|error| ConfigError::IO(path.display().to_string(), error))?;
        Self::parse(&contents, &path.display().to_string())
    }

    pub fn parse(serialized: &str, source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(serialized)
            .map_err(|error| ConfigError::Yaml(source.to_string(), error))
    }

    /// The current wall clock time at the configured precision.
    pub fn now_timestamp(&self) -> i64 {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let timestamp = match self.timestamp_precision {
            TimestampPrecision::Micros => elapsed.as_micros(),
            TimestampPrecision::Millis => elapsed.as_millis(),
        };
        saturating_timestamp(timestamp)
    }
}

/// Clamps an epoch offset to the column timestamp range.
fn saturating_timestamp(timestamp: u128) -> i64 {
    i64::try_from(timestamp).unwrap_or(i64::MAX)
}
