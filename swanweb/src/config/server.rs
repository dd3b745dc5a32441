/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use yaml_rust::Yaml;

use super::value;

const DEFAULT_LISTEN_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_HEADER_MAX_SIZE: usize = 4096;
const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub static_dir: PathBuf,
    pub header_max_size: usize,
    pub recv_timeout: Duration,
}

impl ServerConfig {
    pub(crate) fn new(conf_dir: &Path) -> Self {
        ServerConfig {
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_LISTEN_PORT),
            static_dir: conf_dir.join(DEFAULT_STATIC_DIR),
            header_max_size: DEFAULT_HEADER_MAX_SIZE,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
        }
    }

    pub(crate) fn parse(&mut self, v: &Yaml, conf_dir: &Path) -> anyhow::Result<()> {
        value::foreach_section_kv(v, |k, v| match value::normalize_key(k).as_str() {
            "listen" => {
                self.listen = value::as_sockaddr(v)?;
                Ok(())
            }
            "static_dir" => {
                self.static_dir = value::as_path(v, conf_dir)?;
                Ok(())
            }
            "header_max_size" => {
                self.header_max_size = value::as_usize(v)?;
                Ok(())
            }
            "recv_timeout" => {
                self.recv_timeout = value::as_duration(v)?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        self.check()
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.header_max_size < 64 {
            return Err(anyhow!(
                "header max size {} is too small",
                self.header_max_size
            ));
        }
        if self.recv_timeout.is_zero() {
            return Err(anyhow!("recv timeout should not be zero"));
        }
        Ok(())
    }
}
