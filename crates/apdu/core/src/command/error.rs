//! Error types specific to APDU commands

use thiserror::Error;

/// Error for APDU command encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Data field does not fit a short frame
    #[error("Frame too large: {len} data bytes (max {max})")]
    FrameTooLarge {
        /// Length of the rejected data field
        len: usize,
        /// Largest accepted data field
        max: usize,
    },
}
