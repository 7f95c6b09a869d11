use std::collections::BTreeMap;

use derive_more::Display;
use iso7816_tlv::simple::Tlv;

use super::{Capabilities, Interface, Mode, Version};
use crate::constants::tags;
use crate::{Error, Result};

/// Physical form factor reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FormFactor {
    /// Not reported or not recognised
    #[display("Unknown")]
    Unknown,
    /// USB-A keychain
    #[display("Keychain (USB-A)")]
    UsbAKeychain,
    /// USB-A nano
    #[display("Nano (USB-A)")]
    UsbANano,
    /// USB-C keychain
    #[display("Keychain (USB-C)")]
    UsbCKeychain,
    /// USB-C nano
    #[display("Nano (USB-C)")]
    UsbCNano,
    /// USB-C with Lightning
    #[display("Keychain (USB-C, Lightning)")]
    UsbCLightning,
}

impl From<u8> for FormFactor {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0x01 => Self::UsbAKeychain,
            0x02 => Self::UsbANano,
            0x03 => Self::UsbCKeychain,
            0x04 => Self::UsbCNano,
            0x05 => Self::UsbCLightning,
            _ => Self::Unknown,
        }
    }
}

/// Device configuration as reported by the management application
///
/// Every field is optional: older firmware reports only a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Applications supported over USB
    pub usb_supported: Option<Capabilities>,
    /// Applications enabled over USB
    pub usb_enabled: Option<Capabilities>,
    /// Applications supported over NFC
    pub nfc_supported: Option<Capabilities>,
    /// Applications enabled over NFC
    pub nfc_enabled: Option<Capabilities>,
    /// Device serial
    pub serial: Option<u32>,
    /// Form factor
    pub form_factor: Option<FormFactor>,
    /// Firmware version
    pub version: Option<Version>,
    /// Whether a lock code protects the configuration
    pub config_locked: bool,
}

impl DeviceConfig {
    /// Parse a capabilities reply: one length byte followed by SIMPLE-TLV objects
    ///
    /// Unknown tags are skipped. A missing USB-enabled entry means every
    /// supported USB application is enabled.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (&len, rest) = data
            .split_first()
            .ok_or(Error::InvalidData("Empty capabilities reply"))?;
        let mut remaining = rest
            .get(..len as usize)
            .ok_or(Error::InvalidData("Truncated capabilities reply"))?;

        let mut config = Self::default();
        while !remaining.is_empty() {
            let (tlv, next) = Tlv::parse(remaining);
            let tlv = tlv?;
            let tag: u8 = tlv.tag().into();
            let value = tlv.value();

            match tag {
                tags::USB_SUPPORTED => config.usb_supported = Some(parse_capabilities(value)?),
                tags::USB_ENABLED => config.usb_enabled = Some(parse_capabilities(value)?),
                tags::NFC_SUPPORTED => config.nfc_supported = Some(parse_capabilities(value)?),
                tags::NFC_ENABLED => config.nfc_enabled = Some(parse_capabilities(value)?),
                tags::SERIAL => {
                    let bytes: [u8; 4] = value
                        .try_into()
                        .map_err(|_| Error::InvalidData("Invalid serial length"))?;
                    config.serial = Some(u32::from_be_bytes(bytes));
                }
                tags::FORM_FACTOR => {
                    let &[form_factor] = value else {
                        return Err(Error::InvalidData("Invalid form factor length"));
                    };
                    config.form_factor = Some(form_factor.into());
                }
                tags::VERSION => {
                    config.version = Some(
                        Version::from_bytes(value)
                            .ok_or(Error::InvalidData("Invalid version length"))?,
                    );
                }
                tags::CONFIG_LOCK => config.config_locked = value.first().is_some_and(|&b| b != 0),
                _ => {}
            }

            remaining = next;
        }

        if config.usb_enabled.is_none() {
            config.usb_enabled = config.usb_supported;
        }

        Ok(config)
    }
}

fn parse_capabilities(value: &[u8]) -> Result<Capabilities> {
    match *value {
        [bits] => Ok(Capabilities::from_bits(bits as u16)),
        [hi, lo] => Ok(Capabilities::from_bits(u16::from_be_bytes([hi, lo]))),
        _ => Err(Error::InvalidData("Invalid capabilities length")),
    }
}

/// Identity of one physical device as seen through one connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// USB transports currently enabled
    pub mode: Mode,
    /// Firmware version, `None` when it could not be determined
    pub version: Option<Version>,
    /// Device serial number, `None` when unset or unreadable
    pub serial: Option<u32>,
    /// Form factor, when reported
    pub form_factor: Option<FormFactor>,
    /// Whether a lock code protects the configuration
    pub config_locked: bool,
    /// Applications supported per interface
    pub supported: BTreeMap<Interface, Capabilities>,
    /// Applications enabled per interface
    pub enabled: BTreeMap<Interface, Capabilities>,
}

impl DeviceIdentity {
    /// Applications supported on `interface`, empty when unknown
    pub fn supported_on(&self, interface: Interface) -> Capabilities {
        self.supported.get(&interface).copied().unwrap_or_default()
    }

    /// Applications enabled on `interface`, empty when unknown
    pub fn enabled_on(&self, interface: Interface) -> Capabilities {
        self.enabled.get(&interface).copied().unwrap_or_default()
    }

    /// Whether the firmware belongs to the FIPS series
    pub fn is_fips_version(&self) -> bool {
        self.version.is_some_and(|v| v.is_fips())
    }
}
