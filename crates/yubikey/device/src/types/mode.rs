use std::fmt;

use derive_more::Display;

/// Physical interface a device exposes applications on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Interface {
    /// USB
    #[display("USB")]
    Usb,
    /// NFC
    #[display("NFC")]
    Nfc,
}

/// USB transports currently enabled on the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mode {
    /// Keyboard (OTP) transport
    pub otp: bool,
    /// FIDO transport
    pub u2f: bool,
    /// Smart card transport
    pub ccid: bool,
}

impl Mode {
    /// Create a mode from its transport flags
    pub const fn new(otp: bool, u2f: bool, ccid: bool) -> Self {
        Self { otp, u2f, ccid }
    }

    /// Derive the mode from transport tokens in a reader name
    pub fn from_name(name: &str) -> Self {
        Self {
            otp: name.contains("OTP"),
            u2f: name.contains("U2F"),
            ccid: name.contains("CCID"),
        }
    }

    /// Whether no transport is enabled
    pub const fn is_empty(&self) -> bool {
        !(self.otp || self.u2f || self.ccid)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transports: Vec<&str> = [(self.otp, "OTP"), (self.u2f, "FIDO"), (self.ccid, "CCID")]
            .into_iter()
            .filter_map(|(enabled, name)| enabled.then_some(name))
            .collect();
        write!(f, "{}", transports.join("+"))
    }
}
