//! YubiKey device probing
//!
//! Drives a YubiKey over a smart card connection to resolve its firmware
//! version and identity, probes which applications it supports, and checks
//! whether enabled applications run in FIPS approved mode.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

mod constants;
mod driver;
mod error;
mod fips;
mod types;

pub use constants::*;
pub use driver::{CcidDriver, SelectOutcome};
pub use error::{Error, Result};
pub use fips::{
    CcidDevice, CtapConnection, DeviceEnumerator, FipsApplication, FipsStatus, HidDevice,
    OtpApplication, check_fips_status, get_overall_fips_status,
};
pub use types::{
    Capabilities, Capability, DeviceConfig, DeviceIdentity, FormFactor, Interface, Mode,
    ProductId, Version,
};

/// An open device connection that must be released by its owner
pub trait Connection {
    /// Release the connection; releasing twice is a no-op
    fn release(&mut self) -> Result<()>;
}
