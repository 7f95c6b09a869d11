use derive_more::Display;

/// Firmware version (major.minor.patch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{}.{}.{}", major, minor, patch)]
pub struct Version {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Patch level
    pub patch: u8,
}

impl Version {
    /// Create a version
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Coarse lower bound guessed from a reader name
    ///
    /// NEO readers run at least 3.0.0 and YubiKey 4 readers with CCID at
    /// least 4.1.0. Anything else is unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.contains(" NEO ") {
            Some(Self::new(3, 0, 0))
        } else if name.contains(" 4 ") {
            Some(Self::new(4, 1, 0))
        } else {
            None
        }
    }

    /// Parse the leading three bytes of a version reply
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match data {
            [major, minor, patch, ..] => Some(Self::new(*major, *minor, *patch)),
            _ => None,
        }
    }

    /// FIPS-capable firmware is the 4.4.x series
    pub fn is_fips(&self) -> bool {
        (Self::new(4, 4, 0)..Self::new(4, 5, 0)).contains(self)
    }
}

impl From<(u8, u8, u8)> for Version {
    fn from((major, minor, patch): (u8, u8, u8)) -> Self {
        Self::new(major, minor, patch)
    }
}
