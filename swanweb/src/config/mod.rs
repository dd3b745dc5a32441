/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader, yaml};

mod value;

mod server;
pub use server::ServerConfig;

mod swanctl;
pub use swanctl::SwanctlConfig;

mod vici;
pub use vici::ViciConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwanwebConfig {
    pub server: ServerConfig,
    pub swanctl: SwanctlConfig,
    pub vici: ViciConfig,
}

impl SwanwebConfig {
    pub fn new(conf_dir: &Path) -> Self {
        SwanwebConfig {
            server: ServerConfig::new(conf_dir),
            swanctl: SwanctlConfig::default(),
            vici: ViciConfig::default(),
        }
    }

    /// Parse all docs in `content`, later docs override earlier ones.
    pub fn parse_str(content: &str, conf_dir: &Path) -> anyhow::Result<Self> {
        let docs = YamlLoader::load_from_str(content)
            .map_err(|e| anyhow!("invalid yaml content: {e}"))?;

        let mut config = SwanwebConfig::new(conf_dir);
        for (i, doc) in docs.iter().enumerate() {
            match doc {
                Yaml::Hash(map) => config
                    .parse_doc(map, conf_dir)
                    .context(format!("invalid yaml doc #{i}"))?,
                Yaml::Null => {}
                _ => return Err(anyhow!("yaml doc root should be hash")),
            }
        }
        Ok(config)
    }

    fn parse_doc(&mut self, map: &yaml::Hash, conf_dir: &Path) -> anyhow::Result<()> {
        value::foreach_kv(map, |k, v| match value::normalize_key(k).as_str() {
            "server" => self.server.parse(v, conf_dir),
            "swanctl" => self.swanctl.parse(v),
            "vici" => self.vici.parse(v, conf_dir),
            _ => Err(anyhow!("invalid key {k} in main conf")),
        })
    }
}

pub fn load() -> anyhow::Result<(&'static Path, SwanwebConfig)> {
    let config_file =
        crate::opts::config_file().ok_or_else(|| anyhow!("no config file set"))?;
    let conf_dir =
        crate::opts::config_dir().ok_or_else(|| anyhow!("no valid config dir has been set"))?;

    let content = std::fs::read_to_string(config_file)
        .map_err(|e| anyhow!("failed to read {}: {e}", config_file.display()))?;
    let config = SwanwebConfig::parse_str(&content, conf_dir)?;
    Ok((config_file, config))
}
