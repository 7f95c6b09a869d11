//! I/O faults of a physical connection

use thiserror::Error;

/// Failure of the connection itself
///
/// These are fatal for the connection they happened on. Protocol-level
/// rejections never show up here; they arrive as status words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Device could not be reached or went away
    #[error("Device not reachable")]
    Connection,

    /// Frame could not be exchanged
    #[error("Frame exchange failed")]
    Transmission,

    /// Device was reset or changed state underneath the connection
    #[error("Device state changed during exchange")]
    Device,

    /// Connection was released and cannot be used again
    #[error("Connection already released")]
    Released,

    /// Native driver failure code
    #[error("Driver error {0:#010X}")]
    Driver(u32),
}
