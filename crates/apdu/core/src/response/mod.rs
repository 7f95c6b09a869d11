//! Response decoding
//!
//! A raw response is the payload followed by the two status bytes `SW1 SW2`.

pub mod error;
pub mod status;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use error::ResponseError;
use status::StatusWord;

/// Decoded response: payload plus status word
///
/// A rejected command is still a valid response; callers branch on
/// [`Response::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Bytes,
    status: StatusWord,
}

impl Response {
    /// Create a response from its parts
    pub fn new(payload: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload: payload.into(),
            status: status.into(),
        }
    }

    /// Response with no payload, as sent for most rejections
    pub fn error(status: impl Into<StatusWord>) -> Self {
        Self::new(Bytes::new(), status)
    }

    /// Split a raw response: the last two bytes are the big-endian status word
    pub fn from_bytes(raw: &Bytes) -> Result<Self, ResponseError> {
        let Some(split) = raw.len().checked_sub(2) else {
            return Err(ResponseError::Incomplete { len: raw.len() });
        };

        let status = StatusWord::new(raw[split], raw[split + 1]);
        trace!(%status, payload_len = split, "Decoded response");

        Ok(Self {
            payload: raw.slice(..split),
            status,
        })
    }

    /// Payload without the status word, possibly empty
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Status word closing the response
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Whether the status word is `90 00`
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Split into payload and status word
    pub fn into_parts(self) -> (Bytes, StatusWord) {
        (self.payload, self.status)
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = ResponseError;

    fn try_from(raw: &[u8]) -> Result<Self, ResponseError> {
        Self::from_bytes(&Bytes::copy_from_slice(raw))
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        let mut raw = BytesMut::with_capacity(response.payload.len() + 2);
        raw.put_slice(&response.payload);
        raw.put_u16(response.status.to_u16());
        raw.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_decode_payload_and_status() {
        let resp = Response::from_bytes(&Bytes::copy_from_slice(&hex!("040305 9000"))).unwrap();
        assert_eq!(resp.payload().as_ref(), &[0x04, 0x03, 0x05]);
        assert!(resp.is_success());

        let resp = Response::try_from(&hex!("6A82")[..]).unwrap();
        assert!(resp.payload().is_empty());
        assert_eq!(resp.status(), StatusWord::FILE_NOT_FOUND);
        assert!(!resp.is_success());
    }

    #[test]
    fn test_decode_incomplete() {
        assert_eq!(
            Response::try_from(&[0x90][..]),
            Err(ResponseError::Incomplete { len: 1 })
        );
        assert_eq!(
            Response::from_bytes(&Bytes::new()),
            Err(ResponseError::Incomplete { len: 0 })
        );
    }

    #[test]
    fn test_encode_back_to_raw() {
        let raw: Bytes = Response::new(Bytes::from_static(&[0xAA]), 0x6985u16).into();
        assert_eq!(raw.as_ref(), hex!("AA6985"));

        let raw: Bytes = Response::error((0x6D, 0x00)).into();
        assert_eq!(raw.as_ref(), hex!("6D00"));
    }
}
