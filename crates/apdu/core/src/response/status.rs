//! Two-byte status words closing every response

use std::fmt;

use tracing::Level;

/// Status word `SW1 SW2`, stored big-endian
///
/// `90 00` is the only success value. Everything else is a rejection whose
/// meaning depends on the device and the command that was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusWord(u16);

impl StatusWord {
    /// Success
    pub const SUCCESS: Self = Self(0x9000);
    /// Wrong length in Lc
    pub const WRONG_LENGTH: Self = Self(0x6700);
    /// Security status not satisfied
    pub const SECURITY_CONDITION_NOT_SATISFIED: Self = Self(0x6982);
    /// Conditions of use not satisfied
    pub const CONDITIONS_NOT_SATISFIED: Self = Self(0x6985);
    /// Command not allowed
    pub const COMMAND_NOT_ALLOWED: Self = Self(0x6986);
    /// Application or file not found, the usual answer to selecting a missing AID
    pub const FILE_NOT_FOUND: Self = Self(0x6A82);
    /// Instruction not supported
    pub const INS_NOT_SUPPORTED: Self = Self(0x6D00);
    /// Class not supported
    pub const CLA_NOT_SUPPORTED: Self = Self(0x6E00);

    /// Build from the two trailing response bytes
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self(u16::from_be_bytes([sw1, sw2]))
    }

    /// Build from the combined `SW1SW2` value
    pub const fn from_u16(status: u16) -> Self {
        Self(status)
    }

    /// Combined `SW1SW2` value
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// First status byte
    pub const fn sw1(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Second status byte
    pub const fn sw2(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    /// Whether this is `90 00`
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Log level suited to a response carrying this status
    ///
    /// Rejections are expected while probing, so they stay at DEBUG.
    pub const fn tracing_level(self) -> Level {
        if self.is_success() {
            Level::TRACE
        } else {
            Level::DEBUG
        }
    }

    /// Short human readable meaning
    pub const fn description(self) -> &'static str {
        match self.0 {
            0x9000 => "Success",
            0x6700 => "Wrong length",
            0x6982 => "Security status not satisfied",
            0x6983 => "Authentication method blocked",
            0x6985 => "Conditions of use not satisfied",
            0x6986 => "Command not allowed",
            0x6A80 => "Incorrect parameters in the data field",
            0x6A82 => "File or application not found",
            0x6A86 => "Incorrect parameters P1-P2",
            0x6D00 => "Instruction not supported",
            0x6E00 => "Class not supported",
            sw if sw & 0xFF00 == 0x6100 => "More data available",
            sw if sw & 0xFFF0 == 0x63C0 => "Verification failed, retries left",
            _ => "Unknown status",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Self::new(sw1, sw2)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.0
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1(), self.sw2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_layout() {
        let sw = StatusWord::new(0x6A, 0x82);
        assert_eq!(sw.to_u16(), 0x6A82);
        assert_eq!((sw.sw1(), sw.sw2()), (0x6A, 0x82));
        assert_eq!(sw, StatusWord::FILE_NOT_FOUND);
        assert_eq!(u16::from(StatusWord::from((0x90, 0x00))), 0x9000);
    }

    #[test]
    fn test_only_9000_is_success() {
        assert!(StatusWord::SUCCESS.is_success());
        assert!(!StatusWord::from_u16(0x9001).is_success());
        assert!(!StatusWord::from_u16(0x6100).is_success());
        assert!(!StatusWord::INS_NOT_SUPPORTED.is_success());
    }

    #[test]
    fn test_description_and_display() {
        assert_eq!(StatusWord::SUCCESS.description(), "Success");
        assert_eq!(StatusWord::from_u16(0x63C2).description(), "Verification failed, retries left");
        assert_eq!(StatusWord::from_u16(0x1234).description(), "Unknown status");
        assert_eq!(StatusWord::FILE_NOT_FOUND.to_string(), "6A 82");
        assert_eq!(StatusWord::FILE_NOT_FOUND.tracing_level(), Level::DEBUG);
    }
}
