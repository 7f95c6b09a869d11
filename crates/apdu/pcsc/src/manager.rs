//! Entry point for listing readers and opening connections

use pcsc::{Context, ReaderState, Scope, State};
use tracing::debug;

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;

/// Owns the PC/SC context shared by every connection it opens
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    context: Context,
}

impl PcscDeviceManager {
    /// Establish a user-scope PC/SC context
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List every reader with its card presence
    ///
    /// Fails with [`PcscError::NoReadersAvailable`] when PC/SC knows no reader.
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let names = match self.context.list_readers_owned() {
            Ok(names) if !names.is_empty() => names,
            Ok(_) | Err(pcsc::Error::NoReadersAvailable) => {
                return Err(PcscError::NoReadersAvailable);
            }
            Err(e) => return Err(e.into()),
        };

        let mut states: Vec<ReaderState> = names
            .iter()
            .map(|name| ReaderState::new(name.as_c_str(), State::UNAWARE))
            .collect();
        self.context.get_status_change(None, &mut states)?;

        let readers: Vec<PcscReader> = states.iter().map(PcscReader::from_state).collect();
        debug!(count = readers.len(), "Listed readers");
        Ok(readers)
    }

    /// List YubiKey readers that have a card present
    ///
    /// No readers at all is an empty list, not an error.
    pub fn list_yubikey_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        match self.list_readers() {
            Ok(readers) => Ok(readers
                .into_iter()
                .filter(|r| r.is_yubikey() && r.has_card())
                .collect()),
            Err(PcscError::NoReadersAvailable) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Open a connection to the card in `reader_name` with default settings
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Open a connection to the card in `reader_name`
    pub fn open_reader_with_config(
        &self,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        PcscTransport::connect(self.context.clone(), reader_name, config)
    }
}
