//! FIPS approved mode checks
//!
//! Each application is checked over its own connection type. A connection
//! counts only after its serial matched the target device; mismatching
//! devices are skipped and the scan moves on. Applications not enabled over
//! USB are reported as not approved without opening anything, while
//! applications whose transport cannot be reached are reported as not
//! checked.

use std::collections::{BTreeMap, BTreeSet};

use derive_more::Display;
use tracing::{debug, warn};
use ykprobe_apdu_core::prelude::*;

use crate::constants::ins;
use crate::driver::CcidDriver;
use crate::types::{Capability, DeviceIdentity, Interface, ProductId};
use crate::{Connection, Result};

/// OTP application opened over the keyboard (HID) transport
pub trait OtpApplication: Connection {
    /// Serial number of the device, `None` when unreadable
    fn serial(&mut self) -> Result<Option<u32>>;

    /// Whether the OTP application runs in FIPS approved mode
    fn is_in_fips_mode(&mut self) -> Result<bool>;
}

/// FIDO (CTAP) channel opened over the HID transport
pub trait CtapConnection: Connection {
    /// Resolve the identity of the device behind the channel
    fn read_identity(&mut self, product_id: ProductId) -> Result<DeviceIdentity>;

    /// Send an APDU wrapped in a CTAP message
    fn send_apdu(&mut self, cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Result<Response>;
}

/// Device found on the HID transport
pub trait HidDevice {
    /// OTP connection type
    type Otp: OtpApplication;
    /// FIDO connection type
    type Ctap: CtapConnection;

    /// USB product id
    fn product_id(&self) -> ProductId;
    /// Whether the device exposes the OTP (keyboard) interface
    fn has_otp(&self) -> bool;
    /// Whether the device exposes the FIDO interface
    fn has_ctap(&self) -> bool;
    /// Open the OTP application
    fn open_otp(&self) -> Result<Self::Otp>;
    /// Open the FIDO channel
    fn open_ctap(&self) -> Result<Self::Ctap>;
}

/// Reader found on the smart card transport
pub trait CcidDevice {
    /// Connection type handed to [`CcidDriver`]
    type Transport: CardTransport;

    /// Reader name, also used to seed mode and version
    fn name(&self) -> &str;
    /// Connect to the card in the reader
    fn open(&self) -> Result<Self::Transport>;
}

/// Lists the devices connected over each transport family
pub trait DeviceEnumerator {
    /// HID device type
    type Hid: HidDevice;
    /// Smart card reader type
    type Ccid: CcidDevice;

    /// Whether HID devices can be reached at all
    ///
    /// Without HID access the OTP and FIDO U2F checks cannot run and those
    /// applications are reported as not checked.
    fn has_hid_backend(&self) -> bool {
        true
    }

    /// Devices on the HID transport
    fn list_hid(&self) -> Result<Vec<Self::Hid>>;
    /// Readers on the smart card transport
    fn list_ccid(&self) -> Result<Vec<Self::Ccid>>;
}

/// Applications covered by the FIPS check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum FipsApplication {
    /// FIDO U2F over the HID transport
    #[display("FIDO U2F")]
    FidoU2f,
    /// OATH over the smart card transport
    #[display("OATH")]
    Oath,
    /// OTP over the HID transport
    #[display("OTP")]
    Otp,
}

/// Per-application FIPS approved mode, sorted by application name
///
/// Applications whose transport could not be reached are kept apart as not
/// checked; they are neither approved nor part of the breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FipsStatus {
    results: BTreeMap<FipsApplication, bool>,
    unchecked: BTreeSet<FipsApplication>,
}

impl FipsStatus {
    /// Record the outcome of checking `application`
    pub fn set(&mut self, application: FipsApplication, approved: bool) {
        self.unchecked.remove(&application);
        self.results.insert(application, approved);
    }

    /// Record that `application` could not be checked
    pub fn set_unchecked(&mut self, application: FipsApplication) {
        self.results.remove(&application);
        self.unchecked.insert(application);
    }

    /// Outcome for `application`, `None` when it was not checked
    pub fn get(&self, application: FipsApplication) -> Option<bool> {
        self.results.get(&application).copied()
    }

    /// Whether `application` was left unchecked
    pub fn is_unchecked(&self, application: FipsApplication) -> bool {
        self.unchecked.contains(&application)
    }

    /// Approved overall only when every application in the breakdown is approved
    pub fn is_approved(&self) -> bool {
        self.results.values().all(|approved| *approved)
    }

    /// Overall verdict, `None` when it hinges on applications not checked
    ///
    /// A single application that is not approved settles the verdict even
    /// if others were not checked.
    pub fn overall(&self) -> Option<bool> {
        if !self.is_approved() {
            Some(false)
        } else if self.unchecked.is_empty() {
            Some(true)
        } else {
            None
        }
    }

    /// Checked applications and their outcome, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (FipsApplication, bool)> + '_ {
        self.results.iter().map(|(app, approved)| (*app, *approved))
    }

    /// Every recorded application sorted by name, `None` when not checked
    pub fn breakdown(&self) -> impl Iterator<Item = (FipsApplication, Option<bool>)> + '_ {
        let mut all: BTreeMap<FipsApplication, Option<bool>> =
            self.unchecked.iter().map(|app| (*app, None)).collect();
        all.extend(self.iter().map(|(app, approved)| (app, Some(approved))));
        all.into_iter()
    }

    /// Number of checked applications
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no application was checked
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Run the FIPS check if the firmware belongs to the FIPS series
///
/// Returns `None` when the check does not apply.
pub fn check_fips_status<E: DeviceEnumerator>(
    enumerator: &E,
    product_id: ProductId,
    identity: &DeviceIdentity,
) -> Result<Option<FipsStatus>> {
    if !identity.is_fips_version() {
        debug!(version = ?identity.version, "Not a FIPS firmware, skipping check");
        return Ok(None);
    }
    get_overall_fips_status(enumerator, product_id, identity).map(Some)
}

/// Check every application of the target device for FIPS approved mode
///
/// I/O faults on a matched connection propagate once that connection has been
/// released. Failing to enumerate a transport family or to open a candidate
/// only degrades the affected applications. Applications on a transport the
/// enumerator cannot reach are recorded as not checked.
pub fn get_overall_fips_status<E: DeviceEnumerator>(
    enumerator: &E,
    product_id: ProductId,
    identity: &DeviceIdentity,
) -> Result<FipsStatus> {
    let usb_enabled = identity.enabled_on(Interface::Usb);
    let mut status = FipsStatus::default();

    let Some(target) = identity.serial else {
        warn!("Target device has no readable serial, no connection can be verified");
        status.set(FipsApplication::Otp, false);
        status.set(FipsApplication::Oath, false);
        status.set(FipsApplication::FidoU2f, false);
        return Ok(status);
    };

    let hid_needed = usb_enabled.contains(Capability::Otp) || usb_enabled.contains(Capability::U2f);
    let hid_reachable = enumerator.has_hid_backend();
    if hid_needed && !hid_reachable {
        warn!("No HID backend available, OTP and FIDO U2F are not checked");
    }

    let hid_devices = if hid_needed && hid_reachable {
        match enumerator.list_hid() {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "Failed to list HID devices");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    if !usb_enabled.contains(Capability::Otp) {
        status.set(FipsApplication::Otp, false);
    } else if hid_reachable {
        let otp = otp_in_fips_mode(&hid_devices, product_id, target)?;
        status.set(FipsApplication::Otp, otp);
    } else {
        status.set_unchecked(FipsApplication::Otp);
    }

    let oath = if usb_enabled.contains(Capability::Oath) {
        match enumerator.list_ccid() {
            Ok(devices) => oath_in_fips_mode(&devices, product_id, target)?,
            Err(e) => {
                warn!(error = %e, "Failed to list smart card readers");
                false
            }
        }
    } else {
        false
    };
    status.set(FipsApplication::Oath, oath);

    if !usb_enabled.contains(Capability::U2f) {
        status.set(FipsApplication::FidoU2f, false);
    } else if hid_reachable {
        let u2f = u2f_in_fips_mode(&hid_devices, product_id, target)?;
        status.set(FipsApplication::FidoU2f, u2f);
    } else {
        status.set_unchecked(FipsApplication::FidoU2f);
    }

    Ok(status)
}

/// Run `f` on an open connection and release it on every exit path
fn with_connection<C, R>(mut conn: C, f: impl FnOnce(&mut C) -> Result<R>) -> Result<R>
where
    C: Connection,
{
    let result = f(&mut conn);
    if let Err(e) = conn.release() {
        warn!(error = %e, "Failed to release connection");
    }
    result
}

fn otp_in_fips_mode<D: HidDevice>(devices: &[D], product_id: ProductId, target: u32) -> Result<bool> {
    for device in devices.iter().filter(|d| d.product_id() == product_id && d.has_otp()) {
        let conn = match device.open_otp() {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, "Skipping OTP device that failed to open");
                continue;
            }
        };

        let approved = with_connection(conn, |app| {
            let serial = app.serial()?;
            if serial != Some(target) {
                debug!(?serial, target, "Serial mismatch on OTP device");
                return Ok(None);
            }
            app.is_in_fips_mode().map(Some)
        })?;

        if let Some(approved) = approved {
            return Ok(approved);
        }
    }
    Ok(false)
}

fn oath_in_fips_mode<D: CcidDevice>(devices: &[D], product_id: ProductId, target: u32) -> Result<bool> {
    for device in devices {
        let transport = match device.open() {
            Ok(transport) => transport,
            Err(e) => {
                debug!(reader = device.name(), error = %e, "Skipping reader that failed to open");
                continue;
            }
        };

        let driver = CcidDriver::new(transport, device.name())?;
        let approved = with_connection(driver, |driver| {
            let identity = driver.read_identity(Some(product_id))?;
            if identity.serial != Some(target) {
                debug!(serial = ?identity.serial, target, "Serial mismatch on smart card reader");
                return Ok(None);
            }
            driver.oath_in_fips_mode().map(Some)
        })?;

        if let Some(approved) = approved {
            return Ok(approved);
        }
    }
    Ok(false)
}

fn u2f_in_fips_mode<D: HidDevice>(devices: &[D], product_id: ProductId, target: u32) -> Result<bool> {
    for device in devices.iter().filter(|d| d.product_id() == product_id && d.has_ctap()) {
        let conn = match device.open_ctap() {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, "Skipping FIDO device that failed to open");
                continue;
            }
        };

        let approved = with_connection(conn, |ctap| {
            let identity = ctap.read_identity(product_id)?;
            if identity.serial != Some(target) {
                debug!(serial = ?identity.serial, target, "Serial mismatch on FIDO device");
                return Ok(None);
            }
            // A rejection of the verify command is the negative answer
            let response = ctap.send_apdu(0x00, ins::VERIFY_FIPS_MODE, 0x00, 0x00, &[])?;
            debug!(status = %response.status(), "FIPS verify mode reply");
            Ok(Some(response.is_success()))
        })?;

        if let Some(approved) = approved {
            return Ok(approved);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hex_literal::hex;
    use ykprobe_apdu_core::MockTransport;

    use super::*;
    use crate::constants::{MGR_AID, OATH_AID, OTP_AID};
    use crate::types::{Capabilities, Version};
    use crate::Error;

    const PID: ProductId = ProductId::YK4_OTP_U2F_CCID;
    const TARGET: u32 = 12345;
    const READER: &str = "Yubico Yubikey 4 OTP+U2F+CCID 00 00";

    #[derive(Debug, Clone)]
    struct FakeOtp {
        serial: Option<u32>,
        fips: bool,
        releases: Rc<Cell<usize>>,
    }

    impl Connection for FakeOtp {
        fn release(&mut self) -> Result<()> {
            self.releases.set(self.releases.get() + 1);
            Ok(())
        }
    }

    impl OtpApplication for FakeOtp {
        fn serial(&mut self) -> Result<Option<u32>> {
            Ok(self.serial)
        }

        fn is_in_fips_mode(&mut self) -> Result<bool> {
            Ok(self.fips)
        }
    }

    #[derive(Debug, Clone)]
    struct FakeCtap {
        serial: Option<u32>,
        verify_status: u16,
        io_fault: bool,
        releases: Rc<Cell<usize>>,
    }

    impl Connection for FakeCtap {
        fn release(&mut self) -> Result<()> {
            self.releases.set(self.releases.get() + 1);
            Ok(())
        }
    }

    impl CtapConnection for FakeCtap {
        fn read_identity(&mut self, _product_id: ProductId) -> Result<DeviceIdentity> {
            Ok(DeviceIdentity {
                serial: self.serial,
                ..Default::default()
            })
        }

        fn send_apdu(&mut self, _cla: u8, ins: u8, _p1: u8, _p2: u8, _data: &[u8]) -> Result<Response> {
            assert_eq!(ins, 0x48);
            if self.io_fault {
                return Err(TransportError::Transmission.into());
            }
            Ok(Response::error(self.verify_status))
        }
    }

    #[derive(Debug, Clone)]
    struct FakeHid {
        pid: ProductId,
        otp: Option<FakeOtp>,
        ctap: Option<FakeCtap>,
        fail_open: bool,
    }

    impl FakeHid {
        fn otp(pid: ProductId, serial: u32, fips: bool) -> (Self, Rc<Cell<usize>>) {
            let releases = Rc::new(Cell::new(0));
            let otp = FakeOtp {
                serial: Some(serial),
                fips,
                releases: Rc::clone(&releases),
            };
            (
                Self {
                    pid,
                    otp: Some(otp),
                    ctap: None,
                    fail_open: false,
                },
                releases,
            )
        }

        fn ctap(serial: u32, verify_status: u16, io_fault: bool) -> (Self, Rc<Cell<usize>>) {
            let releases = Rc::new(Cell::new(0));
            let ctap = FakeCtap {
                serial: Some(serial),
                verify_status,
                io_fault,
                releases: Rc::clone(&releases),
            };
            (
                Self {
                    pid: PID,
                    otp: None,
                    ctap: Some(ctap),
                    fail_open: false,
                },
                releases,
            )
        }
    }

    impl HidDevice for FakeHid {
        type Otp = FakeOtp;
        type Ctap = FakeCtap;

        fn product_id(&self) -> ProductId {
            self.pid
        }

        fn has_otp(&self) -> bool {
            self.otp.is_some()
        }

        fn has_ctap(&self) -> bool {
            self.ctap.is_some()
        }

        fn open_otp(&self) -> Result<FakeOtp> {
            if self.fail_open {
                return Err(TransportError::Connection.into());
            }
            self.otp.clone().ok_or(Error::InvalidData("no OTP interface"))
        }

        fn open_ctap(&self) -> Result<FakeCtap> {
            if self.fail_open {
                return Err(TransportError::Connection.into());
            }
            self.ctap.clone().ok_or(Error::InvalidData("no FIDO interface"))
        }
    }

    #[derive(Debug)]
    struct FakeCcid {
        transport: RefCell<Option<MockTransport>>,
    }

    impl CcidDevice for FakeCcid {
        type Transport = MockTransport;

        fn name(&self) -> &str {
            READER
        }

        fn open(&self) -> Result<MockTransport> {
            self.transport
                .borrow_mut()
                .take()
                .ok_or(Error::Transport(TransportError::Connection))
        }
    }

    /// Scripted YubiKey 4 FIPS answering over CCID
    fn ccid_key(serial: u32, oath_fips: bool) -> (FakeCcid, Arc<AtomicUsize>) {
        let mut capabilities = hex!("09 01013F 0204").to_vec();
        capabilities.extend_from_slice(&serial.to_be_bytes());
        capabilities.extend_from_slice(&hex!("9000"));

        let oath_reply = if oath_fips {
            hex!("7903040405 7408 0102030405060708 9000").to_vec()
        } else {
            hex!("7903040405 9000").to_vec()
        };

        let transport = MockTransport::new()
            .with_reply(select(OTP_AID), hex!("040405 9000"))
            .with_reply(select(MGR_AID), hex!("9000"))
            .with_reply(hex!("001D000000"), capabilities)
            .with_reply(select(OATH_AID), oath_reply);
        let releases = transport.release_counter();

        (
            FakeCcid {
                transport: RefCell::new(Some(transport)),
            },
            releases,
        )
    }

    fn select(aid: &[u8]) -> Vec<u8> {
        let mut frame = vec![0x00, 0xA4, 0x04, 0x00, aid.len() as u8];
        frame.extend_from_slice(aid);
        frame
    }

    #[derive(Debug, Default)]
    struct FakeEnumerator {
        hid: Vec<FakeHid>,
        ccid: RefCell<Vec<FakeCcid>>,
        fail_hid: bool,
        no_hid_backend: bool,
        hid_calls: Cell<usize>,
        ccid_calls: Cell<usize>,
    }

    impl DeviceEnumerator for FakeEnumerator {
        type Hid = FakeHid;
        type Ccid = FakeCcid;

        fn has_hid_backend(&self) -> bool {
            !self.no_hid_backend
        }

        fn list_hid(&self) -> Result<Vec<FakeHid>> {
            self.hid_calls.set(self.hid_calls.get() + 1);
            if self.fail_hid {
                return Err(TransportError::Connection.into());
            }
            Ok(self.hid.clone())
        }

        fn list_ccid(&self) -> Result<Vec<FakeCcid>> {
            self.ccid_calls.set(self.ccid_calls.get() + 1);
            Ok(self.ccid.take())
        }
    }

    fn target(enabled: &[Capability]) -> DeviceIdentity {
        let mut identity = DeviceIdentity {
            version: Some(Version::new(4, 4, 5)),
            serial: Some(TARGET),
            ..Default::default()
        };
        identity
            .enabled
            .insert(Interface::Usb, Capabilities::new(enabled));
        identity
    }

    #[test]
    fn test_not_enabled_opens_nothing() {
        let enumerator = FakeEnumerator::default();
        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Piv])).unwrap();

        assert_eq!(enumerator.hid_calls.get(), 0);
        assert_eq!(enumerator.ccid_calls.get(), 0);
        assert_eq!(status.len(), 3);
        assert!(status.iter().all(|(_, approved)| !approved));
        assert!(!status.is_approved());
    }

    #[test]
    fn test_oath_skips_mismatched_serial() {
        let (first, first_releases) = ccid_key(99999, false);
        let (second, second_releases) = ccid_key(TARGET, true);
        let enumerator = FakeEnumerator {
            ccid: RefCell::new(vec![first, second]),
            ..Default::default()
        };

        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Oath])).unwrap();

        assert_eq!(status.get(FipsApplication::Oath), Some(true));
        assert_eq!(status.get(FipsApplication::Otp), Some(false));
        assert_eq!(status.get(FipsApplication::FidoU2f), Some(false));
        assert_eq!(first_releases.load(Ordering::SeqCst), 1);
        assert_eq!(second_releases.load(Ordering::SeqCst), 1);
        assert_eq!(enumerator.hid_calls.get(), 0);
    }

    #[test]
    fn test_oath_no_match_is_not_approved() {
        let (only, releases) = ccid_key(99999, true);
        let enumerator = FakeEnumerator {
            ccid: RefCell::new(vec![only]),
            ..Default::default()
        };

        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Oath])).unwrap();
        assert_eq!(status.get(FipsApplication::Oath), Some(false));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_oath_io_fault_propagates_after_release() {
        let transport = MockTransport::new().with_failure(select(OTP_AID));
        let releases = transport.release_counter();
        let enumerator = FakeEnumerator {
            ccid: RefCell::new(vec![FakeCcid {
                transport: RefCell::new(Some(transport)),
            }]),
            ..Default::default()
        };

        let err = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Oath])).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_otp_requires_serial_match() {
        let (other_pid, other_pid_releases) = FakeHid::otp(ProductId::NEO_OTP, TARGET, true);
        let (mismatch, mismatch_releases) = FakeHid::otp(PID, 99999, true);
        let (matching, matching_releases) = FakeHid::otp(PID, TARGET, false);
        let (after, after_releases) = FakeHid::otp(PID, TARGET, true);
        let enumerator = FakeEnumerator {
            hid: vec![other_pid, mismatch, matching, after],
            ..Default::default()
        };

        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Otp])).unwrap();

        assert_eq!(status.get(FipsApplication::Otp), Some(false));
        assert_eq!(other_pid_releases.get(), 0);
        assert_eq!(mismatch_releases.get(), 1);
        assert_eq!(matching_releases.get(), 1);
        // First match wins
        assert_eq!(after_releases.get(), 0);
        assert_eq!(enumerator.hid_calls.get(), 1);
        assert_eq!(enumerator.ccid_calls.get(), 0);
    }

    #[test]
    fn test_open_failure_skips_candidate() {
        let (mut broken, broken_releases) = FakeHid::otp(PID, TARGET, false);
        broken.fail_open = true;
        let (working, working_releases) = FakeHid::otp(PID, TARGET, true);
        let enumerator = FakeEnumerator {
            hid: vec![broken, working],
            ..Default::default()
        };

        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Otp])).unwrap();
        assert_eq!(status.get(FipsApplication::Otp), Some(true));
        assert_eq!(broken_releases.get(), 0);
        assert_eq!(working_releases.get(), 1);
    }

    #[test]
    fn test_u2f_rejection_means_not_approved() {
        let (rejecting, _) = FakeHid::ctap(TARGET, 0x6D00, false);
        let enumerator = FakeEnumerator {
            hid: vec![rejecting],
            ..Default::default()
        };
        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::U2f])).unwrap();
        assert_eq!(status.get(FipsApplication::FidoU2f), Some(false));

        let (mismatch, _) = FakeHid::ctap(99999, 0x9000, false);
        let (accepting, releases) = FakeHid::ctap(TARGET, 0x9000, false);
        let enumerator = FakeEnumerator {
            hid: vec![mismatch, accepting],
            ..Default::default()
        };
        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::U2f])).unwrap();
        assert_eq!(status.get(FipsApplication::FidoU2f), Some(true));
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_u2f_io_fault_propagates_after_release() {
        let (faulty, releases) = FakeHid::ctap(TARGET, 0x9000, true);
        let enumerator = FakeEnumerator {
            hid: vec![faulty],
            ..Default::default()
        };

        let err = get_overall_fips_status(&enumerator, PID, &target(&[Capability::U2f])).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_overall_is_and_of_breakdown() {
        let (otp, _) = FakeHid::otp(PID, TARGET, true);
        let (ctap, _) = FakeHid::ctap(TARGET, 0x9000, false);
        let (ccid, _) = ccid_key(TARGET, true);
        let enumerator = FakeEnumerator {
            hid: vec![otp, ctap],
            ccid: RefCell::new(vec![ccid]),
            ..Default::default()
        };
        let all = [Capability::Otp, Capability::U2f, Capability::Oath];

        let status = get_overall_fips_status(&enumerator, PID, &target(&all)).unwrap();
        assert!(status.is_approved());
        assert_eq!(enumerator.hid_calls.get(), 1);
        let names: Vec<String> = status.iter().map(|(app, _)| app.to_string()).collect();
        assert_eq!(names, ["FIDO U2F", "OATH", "OTP"]);

        let (otp, _) = FakeHid::otp(PID, TARGET, true);
        let (ctap, _) = FakeHid::ctap(TARGET, 0x6985, false);
        let (ccid, _) = ccid_key(TARGET, true);
        let enumerator = FakeEnumerator {
            hid: vec![otp, ctap],
            ccid: RefCell::new(vec![ccid]),
            ..Default::default()
        };
        let status = get_overall_fips_status(&enumerator, PID, &target(&all)).unwrap();
        assert!(!status.is_approved());
        assert_eq!(status.iter().filter(|(_, approved)| *approved).count(), 2);
    }

    #[test]
    fn test_hid_enumeration_failure_degrades() {
        let enumerator = FakeEnumerator {
            fail_hid: true,
            ..Default::default()
        };
        let status = get_overall_fips_status(
            &enumerator,
            PID,
            &target(&[Capability::Otp, Capability::U2f]),
        )
        .unwrap();

        assert_eq!(status.get(FipsApplication::Otp), Some(false));
        assert_eq!(status.get(FipsApplication::FidoU2f), Some(false));
        assert_eq!(enumerator.hid_calls.get(), 1);
    }

    #[test]
    fn test_check_skipped_outside_fips_firmware() {
        let enumerator = FakeEnumerator::default();
        let mut identity = target(&[Capability::Otp, Capability::Oath]);
        identity.version = Some(Version::new(4, 3, 5));
        assert_eq!(check_fips_status(&enumerator, PID, &identity).unwrap(), None);

        identity.version = None;
        assert_eq!(check_fips_status(&enumerator, PID, &identity).unwrap(), None);
        assert_eq!(enumerator.hid_calls.get() + enumerator.ccid_calls.get(), 0);
    }

    #[test]
    fn test_unknown_target_serial_matches_nothing() {
        let (otp, releases) = FakeHid::otp(PID, TARGET, true);
        let enumerator = FakeEnumerator {
            hid: vec![otp],
            ..Default::default()
        };
        let mut identity = target(&[Capability::Otp]);
        identity.serial = None;

        let status = check_fips_status(&enumerator, PID, &identity).unwrap().unwrap();
        assert!(!status.is_approved());
        assert_eq!(releases.get(), 0);
        assert_eq!(enumerator.hid_calls.get(), 0);
    }

    #[test]
    fn test_unreachable_hid_is_not_checked() {
        let (otp, otp_releases) = FakeHid::otp(PID, TARGET, true);
        let (ccid, _) = ccid_key(TARGET, true);
        let enumerator = FakeEnumerator {
            hid: vec![otp],
            ccid: RefCell::new(vec![ccid]),
            no_hid_backend: true,
            ..Default::default()
        };
        let all = [Capability::Otp, Capability::U2f, Capability::Oath];

        let status = get_overall_fips_status(&enumerator, PID, &target(&all)).unwrap();

        assert_eq!(enumerator.hid_calls.get(), 0);
        assert_eq!(otp_releases.get(), 0);
        assert!(status.is_unchecked(FipsApplication::Otp));
        assert!(status.is_unchecked(FipsApplication::FidoU2f));
        assert_eq!(status.get(FipsApplication::Otp), None);
        assert_eq!(status.get(FipsApplication::Oath), Some(true));
        assert_eq!(status.overall(), None);
        assert_eq!(
            status.breakdown().collect::<Vec<_>>(),
            [
                (FipsApplication::FidoU2f, None),
                (FipsApplication::Oath, Some(true)),
                (FipsApplication::Otp, None),
            ]
        );

        // Disabled applications are still a plain "not approved"
        let enumerator = FakeEnumerator {
            no_hid_backend: true,
            ..Default::default()
        };
        let status = get_overall_fips_status(&enumerator, PID, &target(&[Capability::Piv])).unwrap();
        assert_eq!(status.get(FipsApplication::Otp), Some(false));
        assert!(!status.is_unchecked(FipsApplication::FidoU2f));
        assert_eq!(status.overall(), Some(false));
    }

    #[test]
    fn test_overall_verdict() {
        let mut status = FipsStatus::default();
        status.set(FipsApplication::Oath, true);
        assert_eq!(status.overall(), Some(true));

        status.set_unchecked(FipsApplication::Otp);
        assert!(status.is_approved());
        assert_eq!(status.overall(), None);

        status.set(FipsApplication::FidoU2f, false);
        assert_eq!(status.overall(), Some(false));

        status.set(FipsApplication::Otp, true);
        assert!(!status.is_unchecked(FipsApplication::Otp));
        assert_eq!(status.len(), 3);
    }
}
