//! Core error type for all APDU operations
//!
//! The layer-specific errors (encoding, response decoding and transport I/O)
//! are consolidated here so that callers can bubble them up with `?`.

use crate::command::error::CommandError;
use crate::response::error::ResponseError;
use crate::transport::error::TransportError;

/// Result type for APDU operations
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O fault on the underlying connection
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Command could not be encoded (raised before any I/O)
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Raw response could not be decoded
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl Error {
    /// Check if this error is an I/O fault of the connection
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
