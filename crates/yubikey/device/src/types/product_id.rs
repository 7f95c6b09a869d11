use derive_more::Display;

use super::Mode;

/// USB product id of a YubiKey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{:04x}", _0)]
pub struct ProductId(pub u16);

impl ProductId {
    /// YubiKey NEO, OTP
    pub const NEO_OTP: Self = Self(0x0110);
    /// YubiKey NEO, OTP+CCID
    pub const NEO_OTP_CCID: Self = Self(0x0111);
    /// YubiKey NEO, CCID
    pub const NEO_CCID: Self = Self(0x0112);
    /// YubiKey NEO, FIDO
    pub const NEO_U2F: Self = Self(0x0113);
    /// YubiKey NEO, OTP+FIDO
    pub const NEO_OTP_U2F: Self = Self(0x0114);
    /// YubiKey NEO, FIDO+CCID
    pub const NEO_U2F_CCID: Self = Self(0x0115);
    /// YubiKey NEO, OTP+FIDO+CCID
    pub const NEO_OTP_U2F_CCID: Self = Self(0x0116);

    /// YubiKey 4, OTP
    pub const YK4_OTP: Self = Self(0x0401);
    /// YubiKey 4, FIDO
    pub const YK4_U2F: Self = Self(0x0402);
    /// YubiKey 4, OTP+FIDO
    pub const YK4_OTP_U2F: Self = Self(0x0403);
    /// YubiKey 4, CCID
    pub const YK4_CCID: Self = Self(0x0404);
    /// YubiKey 4, OTP+CCID
    pub const YK4_OTP_CCID: Self = Self(0x0405);
    /// YubiKey 4, FIDO+CCID
    pub const YK4_U2F_CCID: Self = Self(0x0406);
    /// YubiKey 4, OTP+FIDO+CCID
    pub const YK4_OTP_U2F_CCID: Self = Self(0x0407);

    /// Guess the product id of a smart card reader, where the USB id is not visible
    ///
    /// Readers without a NEO marker are assumed to belong to the YubiKey 4
    /// family, which later models share ids with.
    pub fn from_name_and_mode(name: &str, mode: Mode) -> Option<Self> {
        let neo = name.contains(" NEO ");
        let pid = match (mode.otp, mode.u2f, mode.ccid, neo) {
            (true, false, false, true) => Self::NEO_OTP,
            (true, false, true, true) => Self::NEO_OTP_CCID,
            (false, false, true, true) => Self::NEO_CCID,
            (false, true, false, true) => Self::NEO_U2F,
            (true, true, false, true) => Self::NEO_OTP_U2F,
            (false, true, true, true) => Self::NEO_U2F_CCID,
            (true, true, true, true) => Self::NEO_OTP_U2F_CCID,
            (true, false, false, false) => Self::YK4_OTP,
            (false, true, false, false) => Self::YK4_U2F,
            (true, true, false, false) => Self::YK4_OTP_U2F,
            (false, false, true, false) => Self::YK4_CCID,
            (true, false, true, false) => Self::YK4_OTP_CCID,
            (false, true, true, false) => Self::YK4_U2F_CCID,
            (true, true, true, false) => Self::YK4_OTP_U2F_CCID,
            (false, false, false, _) => return None,
        };
        Some(pid)
    }

    /// Whether this is a YubiKey NEO id
    pub const fn is_neo(&self) -> bool {
        matches!(self.0, 0x0110..=0x0116)
    }

    /// Whether this is a YubiKey 4 family id
    pub const fn is_yk4(&self) -> bool {
        matches!(self.0, 0x0401..=0x0407)
    }

    /// Human readable device family
    pub const fn device_type(&self) -> &'static str {
        if self.is_neo() {
            "YubiKey NEO"
        } else if self.is_yk4() {
            "YubiKey 4"
        } else {
            "YubiKey"
        }
    }

    /// USB transports implied by the product id
    pub const fn mode(&self) -> Option<Mode> {
        let mode = match self.0 {
            0x0110 => Mode::new(true, false, false),
            0x0111 => Mode::new(true, false, true),
            0x0112 => Mode::new(false, false, true),
            0x0113 => Mode::new(false, true, false),
            0x0114 => Mode::new(true, true, false),
            0x0115 => Mode::new(false, true, true),
            0x0116 => Mode::new(true, true, true),
            0x0401 => Mode::new(true, false, false),
            0x0402 => Mode::new(false, true, false),
            0x0403 => Mode::new(true, true, false),
            0x0404 => Mode::new(false, false, true),
            0x0405 => Mode::new(true, false, true),
            0x0406 => Mode::new(false, true, true),
            0x0407 => Mode::new(true, true, true),
            _ => return None,
        };
        Some(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_and_mode() {
        let name = "Yubico Yubikey NEO OTP+U2F+CCID 00 00";
        let pid = ProductId::from_name_and_mode(name, Mode::from_name(name)).unwrap();
        assert_eq!(pid, ProductId::NEO_OTP_U2F_CCID);
        assert_eq!(pid.device_type(), "YubiKey NEO");

        let name = "Yubico Yubikey 4 CCID 00 00";
        let pid = ProductId::from_name_and_mode(name, Mode::from_name(name)).unwrap();
        assert_eq!(pid, ProductId::YK4_CCID);
        assert_eq!(pid.to_string(), "0404");

        assert_eq!(ProductId::from_name_and_mode("Reader", Mode::default()), None);
    }

    #[test]
    fn test_mode_matches_pid() {
        for pid in 0x0401..=0x0407 {
            let pid = ProductId(pid);
            let mode = pid.mode().unwrap();
            assert_eq!(ProductId::from_name_and_mode("Yubico Yubikey 4", mode), Some(pid));
        }
        assert_eq!(ProductId(0x1234).mode(), None);
    }
}
