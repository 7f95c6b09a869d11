//! PC/SC transport implementation

use std::{ffi::CString, fmt};

use pcsc::{Card, Context, Disposition, MAX_BUFFER_SIZE};
use tracing::debug;
use ykprobe_apdu_core::prelude::*;

use crate::{config::PcscConfig, error::PcscError};

/// Transport implementation using PC/SC
///
/// The card connection is opened when the transport is created and released
/// exactly once, either through [`CardTransport::disconnect`] or on drop.
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, `None` once released
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Connect to the card in the specified reader
    pub(crate) fn connect(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let reader_cstr = CString::new(reader_name)
            .map_err(|_| PcscError::ReaderNotFound(reader_name.to_string()))?;

        let card = match context.connect(&reader_cstr, config.share_mode, config.protocols) {
            Ok(card) => card,
            Err(pcsc::Error::NoSmartcard) => {
                return Err(PcscError::NoCard(reader_name.to_string()));
            }
            Err(pcsc::Error::UnknownReader) => {
                return Err(PcscError::ReaderNotFound(reader_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        debug!(reader = reader_name, "Connected to card");

        Ok(Self {
            context,
            card: Some(card),
            reader_name: reader_name.to_string(),
            config,
        })
    }

    /// Get the ATR of the current card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        self.card.as_ref().map_or_else(
            || Err(PcscError::Released(self.reader_name.clone())),
            |card| {
                card.get_attribute_owned(pcsc::Attribute::AtrString)
                    .map_err(|e| e.into())
            },
        )
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Transmit a command to the card
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        let card = match &mut self.card {
            Some(card) => card,
            None => return Err(PcscError::Released(self.reader_name.clone())),
        };

        let mut response_buffer = [0u8; MAX_BUFFER_SIZE];
        let response = card.transmit(command, &mut response_buffer)?;
        Ok(Bytes::copy_from_slice(response))
    }

    /// Release the card with the given disposition, at most once
    fn release(&mut self, disposition: Disposition) -> Result<(), PcscError> {
        match self.card.take() {
            Some(card) => {
                debug!(reader = %self.reader_name, "Releasing card");
                card.disconnect(disposition).map_err(|(_, e)| e.into())
            }
            None => Ok(()),
        }
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.transmit_command(command).map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.release(Disposition::ResetCard)?;

        let reader_cstr = CString::new(self.reader_name.clone())
            .map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))?;
        let card = self
            .context
            .connect(&reader_cstr, self.config.share_mode, self.config.protocols)
            .map_err(PcscError::from)?;
        self.card = Some(card);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.release(self.config.disposition).map_err(Into::into)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        let _ = self.release(self.config.disposition);
    }
}
