/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::process::Command;

use super::StatusSource;
use crate::config::SwanctlConfig;

const ARG_LIST_CONNS: &str = "--list-conns";
const ARG_LIST_SAS: &str = "--list-sas";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn {0}: {1}")]
    SpawnFailed(String, io::Error),
    #[error("{command} exited with {status}")]
    ExitFailure {
        command: String,
        status: ExitStatus,
        output: String,
    },
    #[error("{0} timed out after {1:?}")]
    Timeout(String, Duration),
}

impl CommandError {
    /// Whatever the process printed before it failed.
    pub fn output(&self) -> Option<&str> {
        match self {
            CommandError::ExitFailure { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Stdout first, then stderr.
fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut buf = Vec::with_capacity(stdout.len() + stderr.len());
    buf.extend_from_slice(stdout);
    buf.extend_from_slice(stderr);
    String::from_utf8_lossy(&buf).into_owned()
}

pub struct SwanctlRunner {
    path: PathBuf,
    timeout: Duration,
}

impl SwanctlRunner {
    pub fn new(config: &SwanctlConfig) -> Self {
        SwanctlRunner {
            path: config.path.clone(),
            timeout: config.timeout,
        }
    }

    fn display_command(&self, arg: &str) -> String {
        format!("{} {arg}", self.path.display())
    }

    pub async fn run(&self, arg: &str) -> Result<String, CommandError> {
        let mut cmd = Command::new(&self.path);
        cmd.arg(arg)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("running {}", self.display_command(arg));
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CommandError::SpawnFailed(self.display_command(arg), e)),
            Err(_) => {
                return Err(CommandError::Timeout(
                    self.display_command(arg),
                    self.timeout,
                ));
            }
        };

        let text = combined_output(&output.stdout, &output.stderr);
        if output.status.success() {
            Ok(text)
        } else {
            Err(CommandError::ExitFailure {
                command: self.display_command(arg),
                status: output.status,
                output: text,
            })
        }
    }
}

impl StatusSource for SwanctlRunner {
    async fn list_conns(&self) -> Result<String, CommandError> {
        self.run(ARG_LIST_CONNS).await
    }

    async fn list_sas(&self) -> Result<String, CommandError> {
        self.run(ARG_LIST_SAS).await
    }
}
