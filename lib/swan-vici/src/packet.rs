/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::message::get_name;
use crate::{MAX_PACKET_SIZE, ViciDecodeError, ViciEncodeError, ViciError, ViciMessage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketType {
    CmdRequest,
    CmdResponse,
    CmdUnknown,
    EventRegister,
    EventUnregister,
    EventConfirm,
    EventUnknown,
    Event,
}

impl PacketType {
    const fn code(self) -> u8 {
        match self {
            PacketType::CmdRequest => 0,
            PacketType::CmdResponse => 1,
            PacketType::CmdUnknown => 2,
            PacketType::EventRegister => 3,
            PacketType::EventUnregister => 4,
            PacketType::EventConfirm => 5,
            PacketType::EventUnknown => 6,
            PacketType::Event => 7,
        }
    }

    /// Packets of these types carry a name after the type byte.
    const fn is_named(self) -> bool {
        matches!(
            self,
            PacketType::CmdRequest
                | PacketType::EventRegister
                | PacketType::EventUnregister
                | PacketType::Event
        )
    }

    const fn has_message(self) -> bool {
        matches!(
            self,
            PacketType::CmdRequest | PacketType::CmdResponse | PacketType::Event
        )
    }
}

impl TryFrom<u8> for PacketType {
    type Error = ViciDecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PacketType::CmdRequest),
            1 => Ok(PacketType::CmdResponse),
            2 => Ok(PacketType::CmdUnknown),
            3 => Ok(PacketType::EventRegister),
            4 => Ok(PacketType::EventUnregister),
            5 => Ok(PacketType::EventConfirm),
            6 => Ok(PacketType::EventUnknown),
            7 => Ok(PacketType::Event),
            n => Err(ViciDecodeError::InvalidPacketType(n)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ViciPacket {
    pub kind: PacketType,
    pub name: Option<String>,
    pub message: ViciMessage,
}

impl ViciPacket {
    pub fn cmd_request(command: &str, message: ViciMessage) -> Self {
        ViciPacket {
            kind: PacketType::CmdRequest,
            name: Some(command.to_string()),
            message,
        }
    }

    /// Encode with the 32-bit big endian length prefix.
    pub fn encode(&self) -> Result<BytesMut, ViciEncodeError> {
        let name = self.name.as_deref().unwrap_or_default();
        let name_len = if self.kind.is_named() {
            1 + name.len()
        } else {
            0
        };
        let body_len = 1 + name_len + self.message.encoded_len();
        if body_len > MAX_PACKET_SIZE {
            return Err(ViciEncodeError::PacketTooLarge(body_len));
        }

        let mut buf = BytesMut::with_capacity(4 + body_len);
        buf.put_u32(body_len as u32);
        buf.put_u8(self.kind.code());
        if self.kind.is_named() {
            let len = u8::try_from(name.len())
                .map_err(|_| ViciEncodeError::NameTooLong(name.len()))?;
            buf.put_u8(len);
            buf.put_slice(name.as_bytes());
        }
        if self.kind.has_message() {
            self.message.encode(&mut buf)?;
        }
        Ok(buf)
    }

    /// Decode a packet body, the length prefix already stripped.
    pub fn decode(mut buf: &[u8]) -> Result<Self, ViciDecodeError> {
        if !buf.has_remaining() {
            return Err(ViciDecodeError::NotEnoughData);
        }
        let kind = PacketType::try_from(buf.get_u8())?;
        let name = if kind.is_named() {
            Some(get_name(&mut buf)?)
        } else {
            None
        };
        let message = if kind.has_message() {
            ViciMessage::decode(buf)?
        } else {
            ViciMessage::new()
        };
        Ok(ViciPacket {
            kind,
            name,
            message,
        })
    }

    pub async fn send<W>(&self, writer: &mut W) -> Result<(), ViciError>
    where
        W: AsyncWrite + Unpin,
    {
        let buf = self.encode()?;
        writer
            .write_all(buf.as_ref())
            .await
            .map_err(ViciError::WriteFailed)?;
        writer.flush().await.map_err(ViciError::WriteFailed)
    }

    pub async fn recv<R>(reader: &mut R) -> Result<Self, ViciError>
    where
        R: AsyncRead + Unpin,
    {
        let len = reader.read_u32().await.map_err(ViciError::read_failed)? as usize;
        if len > MAX_PACKET_SIZE {
            return Err(ViciError::PacketTooLarge(len));
        }
        let mut body = vec![0u8; len];
        reader
            .read_exact(&mut body)
            .await
            .map_err(ViciError::read_failed)?;
        let packet = ViciPacket::decode(&body)?;
        Ok(packet)
    }
}
