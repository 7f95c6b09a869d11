//! CCID driver for YubiKeys
//!
//! The driver owns one smart card connection. At construction it resolves the
//! USB mode and the firmware version; afterwards it exposes raw APDU exchange
//! and the probes built on top of it. Rejected commands are reported through
//! status words, never as errors.

use std::fmt;

use bytes::Bytes;
use iso7816_tlv::simple::Tlv;
use tracing::{Level, debug, trace, warn};
use ykprobe_apdu_core::prelude::*;

use crate::constants::{
    BROKEN_CAPABILITIES_MASK, BROKEN_CAPABILITIES_REPLY, BROKEN_CAPABILITIES_VERSION,
    KNOWN_APPLETS, MGR_AID, OATH_AID, OTP_AID, OTP_SLOT_DEVICE_SERIAL, ins, tags,
};
use crate::types::{
    Capabilities, Capability, DeviceConfig, DeviceIdentity, Interface, Mode, ProductId, Version,
};
use crate::{Connection, Result};

/// Outcome of selecting an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    /// Whether the device accepted the selection
    pub matched: bool,
    /// Status word returned by the device
    pub status: StatusWord,
    /// Selection reply
    pub payload: Bytes,
}

impl From<Response> for SelectOutcome {
    fn from(response: Response) -> Self {
        let matched = response.is_success();
        let (payload, status) = response.into_parts();
        Self {
            matched,
            status,
            payload,
        }
    }
}

/// YubiKey driver over a smart card connection
pub struct CcidDriver<T: CardTransport> {
    transport: T,
    name: String,
    mode: Mode,
    version: Option<Version>,
}

impl<T: CardTransport> fmt::Debug for CcidDriver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CcidDriver")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("version", &self.version)
            .finish()
    }
}

impl<T: CardTransport> CcidDriver<T> {
    /// Wrap a connection and resolve the device mode and firmware version
    ///
    /// The version is first guessed from the reader name and then replaced by
    /// the exact version from the OTP application, when that application can be
    /// selected. If resolving fails on an I/O fault the connection is released
    /// before the error is returned.
    pub fn new(transport: T, name: &str) -> Result<Self> {
        let mut driver = Self {
            transport,
            name: name.to_string(),
            mode: Mode::from_name(name),
            version: Version::from_name(name),
        };

        if let Err(e) = driver.read_version() {
            if let Err(release) = driver.transport.disconnect() {
                warn!(error = %release, "Failed to release connection");
            }
            return Err(e);
        }

        debug!(name, mode = %driver.mode, version = ?driver.version, "Opened CCID driver");
        Ok(driver)
    }

    fn read_version(&mut self) -> Result<()> {
        let outcome = self.select(OTP_AID)?;
        if !outcome.matched {
            debug!(status = %outcome.status, "OTP application not selectable, keeping version guess");
            return Ok(());
        }

        match Version::from_bytes(&outcome.payload) {
            Some(version) => self.version = Some(version),
            None => debug!(
                payload = %hex::encode(&outcome.payload),
                "OTP select reply too short for a version"
            ),
        }
        Ok(())
    }

    /// Underlying connection
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Reader name the driver was opened with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// USB transports derived from the reader name
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Firmware version, `None` when neither the name nor the device told
    pub const fn version(&self) -> Option<Version> {
        self.version
    }

    /// Send one APDU and return the response, whatever its status word
    pub fn send_apdu(&mut self, cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Result<Response> {
        let command = Command::new_with_data(cla, ins, p1, p2, Bytes::copy_from_slice(data));
        self.transmit(&command)
    }

    /// Send a command and decode the raw reply
    pub fn transmit(&mut self, command: &Command) -> Result<Response> {
        let frame = command.to_bytes()?;
        let raw = self.transport.transmit_raw(&frame)?;
        let response = Response::from_bytes(&raw)?;

        let status = response.status();
        if status.tracing_level() == Level::TRACE {
            trace!(ins = format_args!("{:#04x}", command.ins), %status, "APDU exchanged");
        } else {
            debug!(
                ins = format_args!("{:#04x}", command.ins),
                %status,
                meaning = status.description(),
                "APDU rejected"
            );
        }
        Ok(response)
    }

    /// Select an application by AID
    pub fn select(&mut self, aid: &[u8]) -> Result<SelectOutcome> {
        let response = self.send_apdu(0x00, ins::SELECT, 0x04, 0x00, aid)?;
        Ok(response.into())
    }

    /// Read the raw capabilities reply of the management application
    ///
    /// Returns an empty reply when the management application cannot be
    /// selected or rejects the query. Firmware 4.2.4 misreports capabilities;
    /// for it a fixed reply is returned without talking to the device.
    pub fn read_capabilities(&mut self) -> Result<Bytes> {
        if self.version == Some(BROKEN_CAPABILITIES_VERSION) {
            return Ok(Bytes::from_static(BROKEN_CAPABILITIES_REPLY));
        }

        if !self.select(MGR_AID)?.matched {
            return Ok(Bytes::new());
        }

        let response = self.send_apdu(0x00, ins::GET_CAPABILITIES, 0x00, 0x00, &[])?;
        if !response.is_success() {
            debug!(status = %response.status(), "Capabilities query rejected");
            return Ok(Bytes::new());
        }
        Ok(response.into_parts().0)
    }

    /// Probe which known applications the device supports
    ///
    /// Firmware 4.2.4 gets a fixed mask instead of live probing.
    pub fn probe_applet_support(&mut self) -> Result<Capabilities> {
        if self.version == Some(BROKEN_CAPABILITIES_VERSION) {
            return Ok(Capabilities::from_bits(BROKEN_CAPABILITIES_MASK));
        }
        self.probe_applets(KNOWN_APPLETS)
    }

    /// Select each AID of `applets` and collect the flags of those accepted
    pub fn probe_applets(&mut self, applets: &[(&[u8], Capability)]) -> Result<Capabilities> {
        let mut capabilities = Capabilities::empty();
        for (aid, capability) in applets {
            let outcome = self.select(aid)?;
            trace!(
                aid = %hex::encode(aid),
                matched = outcome.matched,
                status = %outcome.status,
                "Probed applet"
            );
            if outcome.matched {
                capabilities |= *capability;
            }
        }
        Ok(capabilities)
    }

    /// Read the serial number through the OTP application
    pub fn read_serial(&mut self) -> Result<Option<u32>> {
        if !self.select(OTP_AID)?.matched {
            return Ok(None);
        }

        let response = self.send_apdu(0x00, ins::OTP, OTP_SLOT_DEVICE_SERIAL, 0x00, &[])?;
        if !response.is_success() {
            debug!(status = %response.status(), "Serial query rejected");
            return Ok(None);
        }

        Ok(match response.payload().as_ref() {
            [a, b, c, d, ..] => Some(u32::from_be_bytes([*a, *b, *c, *d])),
            _ => None,
        })
    }

    /// Resolve the full identity of the device behind this connection
    ///
    /// Live probing decides which USB applications are supported. The
    /// reported configuration supplies the enabled set, the serial and the NFC
    /// view when present; a serial missing from it is read through the OTP
    /// application.
    pub fn read_identity(&mut self, product_id: Option<ProductId>) -> Result<DeviceIdentity> {
        let capabilities = self.read_capabilities()?;
        let reported = if capabilities.is_empty() {
            None
        } else {
            match DeviceConfig::parse(&capabilities) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!(error = %e, "Ignoring unparseable capabilities reply");
                    None
                }
            }
        };
        let reported = reported.unwrap_or_default();

        let probed = self.probe_applet_support()?;

        let mut identity = DeviceIdentity {
            mode: product_id.and_then(|pid| pid.mode()).unwrap_or(self.mode),
            version: reported.version.or(self.version),
            serial: reported.serial,
            form_factor: reported.form_factor,
            config_locked: reported.config_locked,
            ..Default::default()
        };

        identity.supported.insert(Interface::Usb, probed);
        identity
            .enabled
            .insert(Interface::Usb, reported.usb_enabled.unwrap_or(probed));
        if let Some(nfc_supported) = reported.nfc_supported.filter(|c| !c.is_empty()) {
            identity.supported.insert(Interface::Nfc, nfc_supported);
            identity.enabled.insert(
                Interface::Nfc,
                reported.nfc_enabled.unwrap_or_default(),
            );
        }

        if identity.serial.is_none() {
            identity.serial = self.read_serial()?;
        }

        debug!(
            version = ?identity.version,
            serial = ?identity.serial,
            supported = %probed,
            "Resolved device identity"
        );
        Ok(identity)
    }

    /// Whether the OATH application runs in FIPS approved mode
    ///
    /// That is the case when it can be selected and an access key is set,
    /// which shows as a challenge in the selection reply.
    pub fn oath_in_fips_mode(&mut self) -> Result<bool> {
        let outcome = self.select(OATH_AID)?;
        if !outcome.matched {
            return Ok(false);
        }

        let mut remaining = outcome.payload.as_ref();
        while !remaining.is_empty() {
            let (tlv, next) = Tlv::parse(remaining);
            match tlv {
                Ok(tlv) => {
                    let tag: u8 = tlv.tag().into();
                    if tag == tags::OATH_CHALLENGE {
                        return Ok(true);
                    }
                    remaining = next;
                }
                Err(_) => break,
            }
        }
        Ok(false)
    }

    /// Release the connection
    pub fn close(mut self) -> Result<()> {
        self.release()
    }
}

impl<T: CardTransport> Connection for CcidDriver<T> {
    fn release(&mut self) -> Result<()> {
        self.transport.disconnect()?;
        Ok(())
    }
}

impl<T: CardTransport> Drop for CcidDriver<T> {
    fn drop(&mut self) {
        let _ = self.transport.disconnect();
    }
}
