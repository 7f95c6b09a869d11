//! Readers reported by the PC/SC resource manager

use pcsc::{ReaderState, State};

/// Prefix (lowercase) of the reader names YubiKeys expose over CCID
const YUBIKEY_READER_PREFIX: &str = "yubico yubikey";

/// Snapshot of one reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcscReader {
    name: String,
    atr: Option<Vec<u8>>,
}

impl PcscReader {
    /// Reader with a card answering `atr`, or an empty reader when `None`
    pub const fn new(name: String, atr: Option<Vec<u8>>) -> Self {
        Self { name, atr }
    }

    pub(crate) fn from_state(state: &ReaderState) -> Self {
        let flags = state.event_state();
        let present = flags.contains(State::PRESENT) && !flags.contains(State::EMPTY);
        Self {
            name: state.name().to_string_lossy().into_owned(),
            atr: present.then(|| state.atr().to_vec()),
        }
    }

    /// Reader name as reported by PC/SC
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a card is present
    pub const fn has_card(&self) -> bool {
        self.atr.is_some()
    }

    /// Answer To Reset of the present card
    pub fn atr(&self) -> Option<&[u8]> {
        self.atr.as_deref()
    }

    /// Whether the reader is the CCID interface of a YubiKey
    pub fn is_yubikey(&self) -> bool {
        self.name.to_lowercase().starts_with(YUBIKEY_READER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yubikey_reader_detection() {
        let reader = PcscReader::new("Yubico YubiKey OTP+FIDO+CCID 00 00".into(), Some(vec![0x3B]));
        assert!(reader.is_yubikey());
        assert!(reader.has_card());

        let reader = PcscReader::new("YUBICO YUBIKEY NEO OTP+CCID".into(), None);
        assert!(reader.is_yubikey());
        assert!(!reader.has_card());

        let reader = PcscReader::new("Alcor Micro AU9560 00 00".into(), None);
        assert!(!reader.is_yubikey());
        assert!(reader.atr().is_none());
    }
}
