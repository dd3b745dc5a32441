/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use crate::PacketType;

#[derive(Debug, Error)]
pub enum ViciDecodeError {
    #[error("not enough data")]
    NotEnoughData,
    #[error("invalid packet type {0}")]
    InvalidPacketType(u8),
    #[error("invalid element type {0}")]
    InvalidElementType(u8),
    #[error("invalid utf-8 name")]
    InvalidName,
    #[error("unexpected section end")]
    UnexpectedSectionEnd,
    #[error("section not closed")]
    UnclosedSection,
    #[error("list item outside of list")]
    UnexpectedListItem,
    #[error("list not closed")]
    UnclosedList,
    #[error("too deep nesting")]
    TooDeepNesting,
}

#[derive(Debug, Error)]
pub enum ViciEncodeError {
    #[error("too long name ({0} > 255)")]
    NameTooLong(usize),
    #[error("too long value ({0} > 65535)")]
    ValueTooLong(usize),
    #[error("too large packet ({0})")]
    PacketTooLarge(usize),
}

#[derive(Debug, Error)]
pub enum ViciError {
    #[error("connect failed: {0}")]
    ConnectFailed(io::Error),
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("closed by daemon")]
    ClosedByPeer,
    #[error("too large packet ({0})")]
    PacketTooLarge(usize),
    #[error("invalid packet: {0}")]
    InvalidPacket(#[from] ViciDecodeError),
    #[error("encode failed: {0}")]
    EncodeFailed(#[from] ViciEncodeError),
    #[error("unexpected packet {0:?}")]
    UnexpectedPacket(PacketType),
    #[error("unknown command {0}")]
    UnknownCommand(String),
    #[error("{0}")]
    CommandFailed(String),
}

impl ViciError {
    pub(crate) fn read_failed(e: io::Error) -> Self {
        if matches!(e.kind(), io::ErrorKind::UnexpectedEof) {
            ViciError::ClosedByPeer
        } else {
            ViciError::ReadFailed(e)
        }
    }
}
