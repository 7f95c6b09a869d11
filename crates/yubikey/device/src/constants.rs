//! Application identifiers, instructions and tags

use crate::types::{Capability, Version};

/// OTP application
pub const OTP_AID: &[u8] = b"\xA0\x00\x00\x05\x27\x20\x01";
/// Management application
pub const MGR_AID: &[u8] = b"\xA0\x00\x00\x05\x27\x47\x11\x17";
/// OATH application
pub const OATH_AID: &[u8] = b"\xA0\x00\x00\x05\x27\x21\x01";
/// FIDO U2F application (official)
pub const U2F_AID: &[u8] = b"\xA0\x00\x00\x06\x47\x2F\x00\x01";
/// FIDO U2F application (Yubico, no longer used)
pub const U2F_YUBICO_AID: &[u8] = b"\xA0\x00\x00\x05\x27\x10\x02";
/// PIV application
pub const PIV_AID: &[u8] = b"\xA0\x00\x00\x03\x08";
/// OpenPGP application
pub const OPGP_AID: &[u8] = b"\xD2\x76\x00\x01\x24\x01";

/// Applets probed to build the supported application mask
pub const KNOWN_APPLETS: &[(&[u8], Capability)] = &[
    (OTP_AID, Capability::Otp),
    (U2F_AID, Capability::U2f),
    (U2F_YUBICO_AID, Capability::U2f),
    (PIV_AID, Capability::Piv),
    (OPGP_AID, Capability::Opgp),
    (OATH_AID, Capability::Oath),
];

/// Firmware that misreports its capabilities
pub const BROKEN_CAPABILITIES_VERSION: Version = Version::new(4, 2, 4);
/// Capabilities reply used in place of the device's own on broken firmware
pub const BROKEN_CAPABILITIES_REPLY: &[u8] = b"\x03\x01\x01\x3F";
/// Application mask used in place of probing on broken firmware
pub const BROKEN_CAPABILITIES_MASK: u16 = 0x3F;

/// Instruction bytes
pub mod ins {
    /// SELECT by AID
    pub const SELECT: u8 = 0xA4;
    /// Management application capabilities query
    pub const GET_CAPABILITIES: u8 = 0x1D;
    /// OTP application command, P1 selects the slot or query
    pub const OTP: u8 = 0x01;
    /// FIDO U2F vendor command, succeeds only in FIPS approved mode
    pub const VERIFY_FIPS_MODE: u8 = 0x48;
}

/// OTP query reading the device serial
pub const OTP_SLOT_DEVICE_SERIAL: u8 = 0x10;

pub mod tags {
    //! Tags of the management capabilities reply

    /// Applications supported over USB
    pub const USB_SUPPORTED: u8 = 0x01;
    /// Device serial, big-endian
    pub const SERIAL: u8 = 0x02;
    /// Applications enabled over USB
    pub const USB_ENABLED: u8 = 0x03;
    /// Form factor byte
    pub const FORM_FACTOR: u8 = 0x04;
    /// Firmware version, three bytes
    pub const VERSION: u8 = 0x05;
    /// Non-zero when a lock code protects the configuration
    pub const CONFIG_LOCK: u8 = 0x0A;
    /// Applications supported over NFC
    pub const NFC_SUPPORTED: u8 = 0x0D;
    /// Applications enabled over NFC
    pub const NFC_ENABLED: u8 = 0x0E;

    /// OATH select reply: challenge present when an access key is set
    pub const OATH_CHALLENGE: u8 = 0x74;
}
