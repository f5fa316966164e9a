//! Error types for the routesim-core crate.

use core::fmt;

/// Errors from parsing addresses and prefixes.
///
/// Malformed input is always reported; the parser never produces a
/// garbage numeric value from a bad octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// The address did not have exactly four '.'-separated octets.
    InvalidOctetCount { actual: usize },
    /// An octet was empty, non-decimal, or outside 0-255.
    InvalidOctet { position: usize },
    /// A prefix string had no '/length' part.
    MissingPrefixLength,
    /// The prefix length was empty or not a decimal number.
    InvalidPrefixLength,
    /// The prefix length was outside the valid [0, 32] range.
    PrefixLengthOutOfRange(u8),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidOctetCount { actual } => {
                write!(f, "invalid octet count: expected 4, got {actual}")
            }
            AddressError::InvalidOctet { position } => {
                write!(f, "invalid octet at position {position}")
            }
            AddressError::MissingPrefixLength => write!(f, "missing prefix length"),
            AddressError::InvalidPrefixLength => write!(f, "invalid prefix length"),
            AddressError::PrefixLengthOutOfRange(len) => {
                write!(f, "prefix length out of range: {len} (max 32)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AddressError {}
