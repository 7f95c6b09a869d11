//! PC/SC transport for YubiKey CCID interfaces
//!
//! [`PcscDeviceManager`] lists readers and opens connections; each
//! [`PcscTransport`] owns one card connection and implements
//! `ykprobe_apdu_core::CardTransport`. A transport releases its card once,
//! either when disconnected or when dropped.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ykprobe_apdu_core::prelude::*;
//! use ykprobe_apdu_transport_pcsc::PcscDeviceManager;
//!
//! let manager = PcscDeviceManager::new()?;
//! for reader in manager.list_yubikey_readers()? {
//!     let mut transport = manager.open_reader(reader.name())?;
//!     let select = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, vec![0xA0, 0x00, 0x00, 0x05, 0x27, 0x20, 0x01]);
//!     let response = Response::from_bytes(&transport.transmit_raw(&select.to_bytes()?)?)?;
//!     println!("{}: {}", reader.name(), response.status());
//!     transport.disconnect()?;
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;

pub use config::PcscConfig;
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

pub use pcsc::{Disposition, Protocols, ShareMode};
