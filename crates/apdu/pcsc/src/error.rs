//! Error types for PC/SC transport

use ykprobe_apdu_core::transport::TransportError;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),

    /// Card was released by this transport
    #[error("Card connection already released: {0}")]
    Released(String),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard) => {
                Self::Connection
            }
            PcscError::Pcsc(pcsc::Error::ResetCard) => Self::Device,
            PcscError::Pcsc(e) => Self::Driver(e as u32),
            PcscError::NoCard(_) | PcscError::ReaderNotFound(_) | PcscError::NoReadersAvailable => {
                Self::Connection
            }
            PcscError::Released(_) => Self::Released,
        }
    }
}
