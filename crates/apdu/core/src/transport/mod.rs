//! Transport traits for APDU communication with cards
//!
//! A transport owns one physical connection and moves raw frames across it.
//! It has no knowledge of command structure or status words.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
pub trait CardTransport: Send + Sync + fmt::Debug {
    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = ?hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Reset the transport connection
    fn reset(&mut self) -> Result<(), TransportError>;

    /// Release the underlying connection
    ///
    /// Implementations must release at most once; calling this on an already
    /// released transport is a no-op. Dropping a transport releases it too.
    fn disconnect(&mut self) -> Result<(), TransportError>;
}

impl<T: CardTransport + ?Sized> CardTransport for Box<T> {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command)
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        (**self).reset()
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        (**self).disconnect()
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! Scripted transport for tests

    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Mock transport answering frames from a script
    ///
    /// Replies are keyed by the exact encoded frame. Frames without a scripted
    /// reply get the fallback reply (`6D 00` unless changed).
    #[derive(Debug)]
    pub struct MockTransport {
        replies: HashMap<Vec<u8>, Bytes>,
        failures: HashSet<Vec<u8>>,
        fallback: Bytes,
        commands: Vec<Bytes>,
        connected: bool,
        releases: Arc<AtomicUsize>,
    }

    impl MockTransport {
        /// Create a new mock transport with an empty script
        pub fn new() -> Self {
            Self {
                replies: HashMap::new(),
                failures: HashSet::new(),
                fallback: Bytes::from_static(&[0x6D, 0x00]),
                commands: Vec::new(),
                connected: true,
                releases: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Answer `frame` with the raw `reply` (payload followed by SW1 SW2)
        pub fn with_reply(mut self, frame: impl AsRef<[u8]>, reply: impl AsRef<[u8]>) -> Self {
            self.replies.insert(
                frame.as_ref().to_vec(),
                Bytes::copy_from_slice(reply.as_ref()),
            );
            self
        }

        /// Fail with an I/O fault whenever `frame` is transmitted
        pub fn with_failure(mut self, frame: impl AsRef<[u8]>) -> Self {
            self.failures.insert(frame.as_ref().to_vec());
            self
        }

        /// Replace the reply used for frames that are not scripted
        pub fn with_fallback(mut self, reply: impl AsRef<[u8]>) -> Self {
            self.fallback = Bytes::copy_from_slice(reply.as_ref());
            self
        }

        /// Frames transmitted so far
        pub fn commands(&self) -> &[Bytes] {
            &self.commands
        }

        /// Counter of connection releases, shared so it survives the transport
        pub fn release_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.releases)
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CardTransport for MockTransport {
        fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
            if !self.connected {
                return Err(TransportError::Released);
            }

            self.commands.push(Bytes::copy_from_slice(command));

            if self.failures.contains(command) {
                return Err(TransportError::Transmission);
            }

            Ok(self
                .replies
                .get(command)
                .cloned()
                .unwrap_or_else(|| self.fallback.clone()))
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn reset(&mut self) -> Result<(), TransportError> {
            self.commands.clear();
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), TransportError> {
            if self.connected {
                self.connected = false;
                self.releases.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    impl Drop for MockTransport {
        fn drop(&mut self) {
            let _ = self.disconnect();
        }
    }
}
