use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Application and interface flags reported by a YubiKey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Capability {
    /// Yubico OTP
    Otp = 0x01,
    /// FIDO U2F
    U2f = 0x02,
    /// Smart card (CCID) interface
    Ccid = 0x04,
    /// OpenPGP
    Opgp = 0x08,
    /// PIV
    Piv = 0x10,
    /// OATH
    Oath = 0x20,
    /// FIDO2
    Fido2 = 0x200,
}

impl Capability {
    /// Every known flag, in bit order
    pub const ALL: [Self; 7] = [
        Self::Otp,
        Self::U2f,
        Self::Ccid,
        Self::Opgp,
        Self::Piv,
        Self::Oath,
        Self::Fido2,
    ];

    /// Flags naming an application rather than an interface
    pub const APPLICATIONS: [Self; 6] = [
        Self::Otp,
        Self::U2f,
        Self::Opgp,
        Self::Piv,
        Self::Oath,
        Self::Fido2,
    ];

    /// Bit of this flag
    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Otp => "OTP",
            Self::U2f => "FIDO U2F",
            Self::Ccid => "CCID",
            Self::Opgp => "OpenPGP",
            Self::Piv => "PIV",
            Self::Oath => "OATH",
            Self::Fido2 => "FIDO2",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u16);

impl Capabilities {
    /// Mask with every flag in `capabilities` set
    pub fn new(capabilities: &[Capability]) -> Self {
        Self(capabilities.iter().fold(0, |flags, &cap| flags | cap.bits()))
    }

    /// Mask with no flag set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mask from raw bits, unknown bits included
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Whether no flag is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether `capability` is set
    pub const fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bits() != 0
    }

    /// Set `capability`
    pub const fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bits();
    }

    /// Iterate over the known flags that are set
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(move |cap| self.contains(*cap))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Capability::name).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl From<u16> for Capabilities {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Capability> for Capabilities {
    fn from(value: Capability) -> Self {
        Self(value.bits())
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Capability> for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Capability) -> Self {
        Self(self.0 | rhs.bits())
    }
}

impl BitOrAssign<Capability> for Capabilities {
    fn bitor_assign(&mut self, rhs: Capability) {
        self.insert(rhs);
    }
}
