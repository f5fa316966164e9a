//! Newtype wrappers for addresses, prefixes, and router identifiers.
//!
//! These types provide type safety and carry the strict parsing contract:
//! an address is exactly four '.'-separated decimal octets, and a prefix
//! length is always within [0, 32]. Malformed input parses to an
//! [`AddressError`], never to an undefined numeric value.

extern crate alloc;

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::AddressError;

/// An IPv4 address held as its 32-bit big-endian integer value
/// (most-significant octet first).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct Ipv4Address(u32);

impl Ipv4Address {
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(octets))
    }

    /// The address as a 32-bit integer, for mask arithmetic.
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// Parse one decimal octet. Rejects empty tokens, non-digit characters
/// (including signs), and values above 255.
fn parse_octet(token: &str, position: usize) -> Result<u8, AddressError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::InvalidOctet { position });
    }
    token
        .parse::<u8>()
        .map_err(|_| AddressError::InvalidOctet { position })
}

impl FromStr for Ipv4Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 4];
        let mut count = 0;
        for (i, token) in s.split('.').enumerate() {
            if i >= 4 {
                return Err(AddressError::InvalidOctetCount {
                    actual: s.split('.').count(),
                });
            }
            octets[i] = parse_octet(token, i)?;
            count = i + 1;
        }
        if count != 4 {
            return Err(AddressError::InvalidOctetCount { actual: count });
        }
        Ok(Self::from_octets(octets))
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl fmt::Debug for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ipv4Address({self})")
    }
}

/// An IPv4 network prefix: a network address plus a prefix length.
///
/// The stored network address is canonical: host bits below the prefix
/// length are always zero, so two prefixes compare equal iff they denote
/// the same network. Ordering is by (network bits, length), which gives
/// routing tables a deterministic iteration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct Prefix {
    network: Ipv4Address,
    len: u8,
}

impl Prefix {
    /// Create a prefix, canonicalizing the network address.
    ///
    /// Fails with [`AddressError::PrefixLengthOutOfRange`] if `len > 32`.
    pub fn new(network: Ipv4Address, len: u8) -> Result<Self, AddressError> {
        if len > 32 {
            return Err(AddressError::PrefixLengthOutOfRange(len));
        }
        let mask = mask_bits(len);
        Ok(Self {
            network: Ipv4Address::from_bits(network.to_bits() & mask),
            len,
        })
    }

    #[must_use]
    pub const fn network(&self) -> Ipv4Address {
        self.network
    }

    /// Number of leading bits that define the network (0-32).
    #[must_use]
    pub const fn len(&self) -> u8 {
        self.len
    }

    /// The 32-bit netmask. A length of 0 yields an all-zero mask.
    #[must_use]
    pub const fn mask(&self) -> u32 {
        mask_bits(self.len)
    }

    /// Whether `addr` falls inside this prefix.
    ///
    /// A zero-length prefix (the default route) contains every address.
    #[must_use]
    pub const fn contains(&self, addr: Ipv4Address) -> bool {
        (addr.to_bits() & self.mask()) == self.network.to_bits()
    }
}

/// Netmask for a prefix length. `len == 0` must not shift by 32.
const fn mask_bits(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (32 - len)
    }
}

impl FromStr for Prefix {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s.split_once('/').ok_or(AddressError::MissingPrefixLength)?;
        let network = addr.parse::<Ipv4Address>()?;
        if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::InvalidPrefixLength);
        }
        let len = len
            .parse::<u8>()
            .map_err(|_| AddressError::InvalidPrefixLength)?;
        Self::new(network, len)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.len)
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({self})")
    }
}

/// Identifier of a router or next hop, e.g. `"Router_A"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct RouterId(String);

impl RouterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RouterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouterId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RouterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouterId({})", self.0)
    }
}
