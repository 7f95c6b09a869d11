//! APDU command frames
//!
//! Commands are encoded as short frames: a four byte header followed by a
//! single length byte and the data field. The length byte is always present,
//! even for an empty data field, so the smallest frame is five bytes long.

pub mod error;

use bytes::{BufMut, Bytes, BytesMut};

use error::CommandError;

/// Largest data field that fits the single length byte of a short frame
pub const MAX_SHORT_DATA_LEN: usize = 255;

/// Length of the `CLA INS P1 P2 Lc` prefix
const HEADER_LEN: usize = 5;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data, possibly empty
    pub data: Bytes,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Bytes::new(),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: data.into(),
        }
    }

    /// Calculate length of the encoded frame
    pub fn command_length(&self) -> usize {
        HEADER_LEN + self.data.len()
    }

    /// Encode into a raw frame `[CLA, INS, P1, P2, Lc] ++ DATA`
    ///
    /// Fails with [`CommandError::FrameTooLarge`] when the data field does not
    /// fit the single length byte.
    pub fn to_bytes(&self) -> Result<Bytes, CommandError> {
        let len = self.data.len();
        if len > MAX_SHORT_DATA_LEN {
            return Err(CommandError::FrameTooLarge {
                len,
                max: MAX_SHORT_DATA_LEN,
            });
        }

        let mut buffer = BytesMut::with_capacity(self.command_length());
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);
        buffer.put_u8(len as u8);
        buffer.put_slice(&self.data);

        Ok(buffer.freeze())
    }
}
