//! The packet record and service-priority classification.

use core::fmt;

use crate::types::Ipv4Address;

/// Unique identifier of a packet within a run.
///
/// Absence of a packet is always expressed with `Option<Packet>`, never
/// with a reserved id value. Id 0 is rejected at the input boundary so it
/// can never collide with legacy "no packet" conventions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct PacketId(u64);

impl PacketId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PacketId({})", self.0)
    }
}

/// Service priority of a packet, derived from its destination port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Classify a destination port into a priority class.
    ///
    /// Well-known ports (0-1023) are High, registered ports (1024-49151)
    /// are Medium, and dynamic/ephemeral ports (49152-65535) are Low.
    #[must_use]
    pub const fn from_port(port: u16) -> Self {
        match port {
            0..=1023 => Priority::High,
            1024..=49151 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("High"),
            Priority::Medium => f.write_str("Medium"),
            Priority::Low => f.write_str("Low"),
        }
    }
}

/// One unit of traffic moving through the router.
///
/// The TTL is decremented once per hop by the pipeline; the priority is
/// assigned once during classification and unset before that.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Packet {
    pub id: PacketId,
    pub source: Ipv4Address,
    pub destination: Ipv4Address,
    pub port: u16,
    pub ttl: u8,
    pub priority: Option<Priority>,
}

impl Packet {
    pub fn new(id: PacketId, source: Ipv4Address, destination: Ipv4Address, port: u16, ttl: u8) -> Self {
        Self {
            id,
            source,
            destination,
            port,
            ttl,
            priority: None,
        }
    }

    /// Decrement the TTL by one hop, saturating at zero.
    pub fn decrement_ttl(&mut self) {
        self.ttl = self.ttl.saturating_sub(1);
    }

    /// Whether the TTL has been exhausted.
    #[must_use]
    pub const fn ttl_expired(&self) -> bool {
        self.ttl == 0
    }
}
