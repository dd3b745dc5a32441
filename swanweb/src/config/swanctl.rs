/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use yaml_rust::Yaml;

use super::value;

const DEFAULT_SWANCTL_PATH: &str = "swanctl";
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwanctlConfig {
    /// Looked up in `PATH` unless it contains a separator.
    pub path: PathBuf,
    pub timeout: Duration,
}

impl Default for SwanctlConfig {
    fn default() -> Self {
        SwanctlConfig {
            path: PathBuf::from(DEFAULT_SWANCTL_PATH),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl SwanctlConfig {
    pub(crate) fn parse(&mut self, v: &Yaml) -> anyhow::Result<()> {
        value::foreach_section_kv(v, |k, v| match value::normalize_key(k).as_str() {
            "path" => {
                let path = value::as_string(v)?;
                if path.is_empty() {
                    return Err(anyhow!("empty swanctl path"));
                }
                self.path = PathBuf::from(path);
                Ok(())
            }
            "timeout" => {
                self.timeout = value::as_duration(v)?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        if self.timeout.is_zero() {
            return Err(anyhow!("swanctl timeout should not be zero"));
        }
        Ok(())
    }
}
