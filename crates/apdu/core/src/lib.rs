//! Short APDU frames and the transports that carry them
//!
//! The crate covers the lowest layer of talking to a smart-card class device:
//!
//! - [`Command`] encodes `CLA INS P1 P2 Lc DATA` frames, rejecting data fields
//!   that do not fit the single length byte before any I/O happens
//! - [`Response`] splits a raw reply into payload and [`StatusWord`]
//! - [`CardTransport`] is implemented by each physical connection
//!
//! Rejected commands are not errors here. They come back as a [`Response`]
//! with a non-success status word, and only I/O faults of the connection
//! surface as [`transport::error::TransportError`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;
pub mod transport;

mod error;
pub use error::{Error, Result};

pub use command::{Command, MAX_SHORT_DATA_LEN};
pub use response::Response;
pub use response::status::StatusWord;
pub use transport::CardTransport;

#[cfg(any(test, feature = "mock"))]
pub use transport::mock::MockTransport;

/// Commonly used types and traits
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, Response, Result,
        command::error::CommandError,
        response::error::ResponseError,
        response::status::StatusWord,
        transport::{CardTransport, error::TransportError},
    };
}
