//! How smart card connections are opened and released

use pcsc::{Disposition, Protocols, ShareMode};

/// Connection settings for [`crate::PcscTransport`]
///
/// Defaults to shared access over any protocol, leaving the card untouched
/// on release so other applications keep their state.
#[derive(Debug, Clone, Copy)]
pub struct PcscConfig {
    /// Sharing mode requested from the resource manager
    pub share_mode: ShareMode,
    /// Acceptable protocols
    pub protocols: Protocols,
    /// What happens to the card when the connection is released
    pub disposition: Disposition,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            share_mode: ShareMode::Shared,
            protocols: Protocols::ANY,
            disposition: Disposition::LeaveCard,
        }
    }
}

impl PcscConfig {
    /// Request exclusive access to the card
    pub const fn exclusive(mut self) -> Self {
        self.share_mode = ShareMode::Exclusive;
        self
    }

    /// Restrict the acceptable protocols
    pub const fn with_protocols(mut self, protocols: Protocols) -> Self {
        self.protocols = protocols;
        self
    }

    /// Change what happens to the card on release
    pub const fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let config = PcscConfig::default();
        assert_eq!(config.share_mode, ShareMode::Shared);
        assert_eq!(config.protocols, Protocols::ANY);
        assert_eq!(config.disposition, Disposition::LeaveCard);

        let config = PcscConfig::default()
            .exclusive()
            .with_protocols(Protocols::T1)
            .with_disposition(Disposition::ResetCard);
        assert_eq!(config.share_mode, ShareMode::Exclusive);
        assert_eq!(config.protocols, Protocols::T1);
        assert_eq!(config.disposition, Disposition::ResetCard);
    }
}
