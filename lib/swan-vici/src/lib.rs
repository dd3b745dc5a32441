/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod error;
pub use error::{ViciDecodeError, ViciEncodeError, ViciError};

mod message;
pub use message::{ViciMessage, ViciValue};

mod packet;
pub use packet::{PacketType, ViciPacket};

mod session;
pub use session::ViciSession;

/// Where charon listens by default.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/charon.vici";

/// Upper bound of a single packet, the same as charon enforces.
pub const MAX_PACKET_SIZE: usize = 512 * 1024;
