/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;

use crate::{PacketType, ViciError, ViciMessage, ViciPacket};

/// A command session with the IKE daemon.
///
/// Requests are strictly sequential, each one waits for its response.
pub struct ViciSession<S = UnixStream> {
    stream: S,
}

impl ViciSession<UnixStream> {
    pub async fn connect<P: AsRef<Path>>(path: P) -> Result<Self, ViciError> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(ViciError::ConnectFailed)?;
        Ok(ViciSession::new(stream))
    }
}

impl<S> ViciSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        ViciSession { stream }
    }

    /// Send a command and wait for its response message.
    ///
    /// Event packets arriving in between are skipped.
    pub async fn command_request(
        &mut self,
        command: &str,
        message: ViciMessage,
    ) -> Result<ViciMessage, ViciError> {
        ViciPacket::cmd_request(command, message)
            .send(&mut self.stream)
            .await?;

        loop {
            let packet = ViciPacket::recv(&mut self.stream).await?;
            match packet.kind {
                PacketType::CmdResponse => return Ok(packet.message),
                PacketType::CmdUnknown => {
                    return Err(ViciError::UnknownCommand(command.to_string()));
                }
                PacketType::Event => {}
                kind => return Err(ViciError::UnexpectedPacket(kind)),
            }
        }
    }

    pub async fn initiate(&mut self, child: &str) -> Result<(), ViciError> {
        self.child_command("initiate", child).await
    }

    pub async fn terminate(&mut self, child: &str) -> Result<(), ViciError> {
        self.child_command("terminate", child).await
    }

    async fn child_command(&mut self, command: &str, child: &str) -> Result<(), ViciError> {
        let rsp = self
            .command_request(command, ViciMessage::child_request(child))
            .await?;
        rsp.check_success()
    }
}
