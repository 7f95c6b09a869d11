use iso7816_tlv::TlvError;
use ykprobe_apdu_core::prelude::{CommandError, ResponseError, TransportError};

/// Result type for YubiKey device operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for YubiKey device operations
///
/// A rejected command is not an error: it comes back as a status word inside
/// the response. Only encoding violations, I/O faults and undecodable device
/// data end up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// APDU layer errors
    #[error(transparent)]
    Apdu(#[from] ykprobe_apdu_core::Error),

    /// Transport-related errors
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Command-related errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Response-related errors
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// TLV decoding errors
    #[error("TlvError: {0}")]
    Tlv(TlvError),

    /// Device returned data that could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(&'static str),
}

impl From<TlvError> for Error {
    fn from(error: TlvError) -> Self {
        Self::Tlv(error)
    }
}

impl Error {
    /// Check if this error is an I/O fault of the underlying connection
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Apdu(e) => e.is_transport(),
            _ => false,
        }
    }
}
