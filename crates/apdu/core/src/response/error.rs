//! Response decoding errors

use thiserror::Error;

/// Raw response that cannot be split into payload and status word
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Fewer bytes than the two status bytes
    #[error("Incomplete response: {len} bytes, a status word needs 2")]
    Incomplete {
        /// Number of bytes received
        len: usize,
    },
}
