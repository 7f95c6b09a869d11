//! Device enumeration backing the FIPS check
//!
//! Smart card readers come from PC/SC. This build has no HID backend, so the
//! OTP and FIDO U2F checks are reported as not checked.

use ykprobe_apdu_core::{Response, prelude::TransportError};
use ykprobe_apdu_transport_pcsc::{PcscDeviceManager, PcscReader, PcscTransport};
use ykprobe_device::{
    CcidDevice, Connection, CtapConnection, DeviceEnumerator, DeviceIdentity, HidDevice,
    OtpApplication, ProductId, Result,
};

/// Enumerates the devices visible to this build
pub struct SystemEnumerator<'a> {
    manager: &'a PcscDeviceManager,
}

impl<'a> SystemEnumerator<'a> {
    pub const fn new(manager: &'a PcscDeviceManager) -> Self {
        Self { manager }
    }
}

impl<'a> DeviceEnumerator for SystemEnumerator<'a> {
    type Hid = NoHid;
    type Ccid = PcscCcidDevice<'a>;

    fn has_hid_backend(&self) -> bool {
        false
    }

    fn list_hid(&self) -> Result<Vec<NoHid>> {
        Ok(Vec::new())
    }

    fn list_ccid(&self) -> Result<Vec<PcscCcidDevice<'a>>> {
        let readers = self
            .manager
            .list_yubikey_readers()
            .map_err(TransportError::from)?;

        Ok(readers
            .into_iter()
            .map(|reader| PcscCcidDevice {
                manager: self.manager,
                reader,
            })
            .collect())
    }
}

/// YubiKey reader reachable over PC/SC
pub struct PcscCcidDevice<'a> {
    manager: &'a PcscDeviceManager,
    reader: PcscReader,
}

impl CcidDevice for PcscCcidDevice<'_> {
    type Transport = PcscTransport;

    fn name(&self) -> &str {
        self.reader.name()
    }

    fn open(&self) -> Result<PcscTransport> {
        self.manager
            .open_reader(self.reader.name())
            .map_err(|e| TransportError::from(e).into())
    }
}

/// HID device of a build without HID support; cannot be constructed
#[derive(Debug)]
pub enum NoHid {}

impl HidDevice for NoHid {
    type Otp = NoHid;
    type Ctap = NoHid;

    fn product_id(&self) -> ProductId {
        match *self {}
    }

    fn has_otp(&self) -> bool {
        match *self {}
    }

    fn has_ctap(&self) -> bool {
        match *self {}
    }

    fn open_otp(&self) -> Result<NoHid> {
        match *self {}
    }

    fn open_ctap(&self) -> Result<NoHid> {
        match *self {}
    }
}

impl Connection for NoHid {
    fn release(&mut self) -> Result<()> {
        match *self {}
    }
}

impl OtpApplication for NoHid {
    fn serial(&mut self) -> Result<Option<u32>> {
        match *self {}
    }

    fn is_in_fips_mode(&mut self) -> Result<bool> {
        match *self {}
    }
}

impl CtapConnection for NoHid {
    fn read_identity(&mut self, _product_id: ProductId) -> Result<DeviceIdentity> {
        match *self {}
    }

    fn send_apdu(&mut self, _cla: u8, _ins: u8, _p1: u8, _p2: u8, _data: &[u8]) -> Result<Response> {
        match *self {}
    }
}
