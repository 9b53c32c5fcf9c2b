// Copyright 2025 Winframe Contributors
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

//! Engine configuration
//!
//! Configs are built with `Default`, with builder methods, or parsed from a
//! query-parameter style string:
//!
//! ```text
//! parallel=off
//! parallel=on&parallel_min_partitions=8&parallel_min_rows=10000
//! ```
//!
//! Unknown keys are ignored so strings can be shared with other settings.

use std::str::FromStr;

use crate::core::{Error, Result};

use super::parallel::ParallelConfig;

/// Configuration for an [`Executor`](super::Executor)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub parallel: ParallelConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that always evaluates partitions on the calling thread
    pub fn disabled_parallelism() -> Self {
        Self {
            parallel: ParallelConfig::disabled(),
        }
    }

    /// Replace the parallel execution settings
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse `key=value&key=value` settings on top of the defaults
    pub fn parse(params: &str) -> Result<Self> {
        let mut config = Self::default();

        for param in params.split('&').map(str::trim).filter(|p| !p.is_empty()) {
            let mut parts = param.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();

            match key {
                // Parallel evaluation: parallel=on|off
                "parallel" => {
                    config.parallel.enabled = match value.to_lowercase().as_str() {
                        "on" | "true" | "1" | "yes" => true,
                        "off" | "false" | "0" | "no" => false,
                        _ => {
                            return Err(Error::config(format!(
                                "parallel must be on or off, got '{}'",
                                value
                            )))
                        }
                    };
                }
                // Minimum partitions: parallel_min_partitions=4
                "parallel_min_partitions" => {
                    config.parallel.min_partitions = parse_count(key, value)?;
                }
                // Minimum rows: parallel_min_rows=1024
                "parallel_min_rows" => {
                    config.parallel.min_rows = parse_count(key, value)?;
                }
                _ => {
                    tracing::debug!(key, "ignoring unknown configuration key");
                }
            }
        }

        Ok(config)
    }
}

impl FromStr for EngineConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| Error::config(format!("{} expects a non-negative integer, got '{}'", key, value)))
}
