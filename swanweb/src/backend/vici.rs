/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use swan_vici::{ViciError, ViciSession};

use super::ChildSaControl;
use crate::config::ViciConfig;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Vici(#[from] ViciError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Clone, Copy, Debug)]
enum ChildCommand {
    Initiate,
    Terminate,
}

/// Opens a new VICI session for every request.
pub struct ViciControl {
    socket: PathBuf,
    timeout: Duration,
}

impl ViciControl {
    pub fn new(config: &ViciConfig) -> Self {
        ViciControl {
            socket: config.socket.clone(),
            timeout: config.timeout,
        }
    }

    async fn run_child_command(&self, command: ChildCommand, name: &str) -> Result<(), ViciError> {
        let mut session = ViciSession::connect(&self.socket).await?;
        match command {
            ChildCommand::Initiate => session.initiate(name).await,
            ChildCommand::Terminate => session.terminate(name).await,
        }
    }

    async fn child_command(&self, command: ChildCommand, name: &str) -> Result<(), ControlError> {
        debug!("vici {command:?} child {name} via {}", self.socket.display());
        match tokio::time::timeout(self.timeout, self.run_child_command(command, name)).await {
            Ok(r) => r.map_err(ControlError::from),
            Err(_) => Err(ControlError::Timeout(self.timeout)),
        }
    }
}

impl ChildSaControl for ViciControl {
    async fn initiate(&self, name: &str) -> Result<(), ControlError> {
        self.child_command(ChildCommand::Initiate, name).await
    }

    async fn terminate(&self, name: &str) -> Result<(), ControlError> {
        self.child_command(ChildCommand::Terminate, name).await
    }
}
