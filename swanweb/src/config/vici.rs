/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use yaml_rust::Yaml;

use super::value;

const DEFAULT_VICI_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViciConfig {
    pub socket: PathBuf,
    pub timeout: Duration,
}

impl Default for ViciConfig {
    fn default() -> Self {
        ViciConfig {
            socket: PathBuf::from(swan_vici::DEFAULT_SOCKET_PATH),
            timeout: DEFAULT_VICI_TIMEOUT,
        }
    }
}

impl ViciConfig {
    pub(crate) fn parse(&mut self, v: &Yaml, conf_dir: &Path) -> anyhow::Result<()> {
        value::foreach_section_kv(v, |k, v| match value::normalize_key(k).as_str() {
            "socket" => {
                self.socket = value::as_path(v, conf_dir)?;
                Ok(())
            }
            "timeout" => {
                self.timeout = value::as_duration(v)?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        if self.timeout.is_zero() {
            return Err(anyhow!("vici timeout should not be zero"));
        }
        Ok(())
    }
}
