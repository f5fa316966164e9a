//! Per-packet hop trace and forwarding-loop detection.
//!
//! A [`PacketHistory`] keeps the ordered trace of hop events for one
//! packet together with the set of router ids the packet has already
//! visited. Membership in the visited set, not ordering, is what loop
//! detection uses.

use std::collections::HashSet;
use std::time::SystemTime;

use routesim_core::{PacketId, RouterId};

/// Why a packet was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// TTL reached zero after the per-hop decrement.
    TtlExpired,
    /// No routing table entry matched the destination.
    NoRoute,
    /// The packet had already visited this router.
    Loop,
}

/// Outcome label recorded for one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopAction {
    Forwarded,
    Dropped(DropReason),
}

impl std::fmt::Display for HopAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HopAction::Forwarded => f.write_str("FORWARDED"),
            HopAction::Dropped(DropReason::TtlExpired) => f.write_str("DROPPED (TTL expired)"),
            HopAction::Dropped(DropReason::NoRoute) => f.write_str("DROPPED (no route)"),
            HopAction::Dropped(DropReason::Loop) => f.write_str("DROPPED (loop)"),
        }
    }
}

/// One recorded hop event. Immutable once constructed.
#[derive(Debug, Clone)]
#[must_use]
pub struct TraceEntry {
    router: RouterId,
    action: HopAction,
    queue_delay_ms: u64,
    remaining_ttl: u8,
    next_hop: Option<RouterId>,
    timestamp: SystemTime,
}

impl TraceEntry {
    /// Create a trace entry stamped with the current wall-clock time.
    pub fn new(
        router: RouterId,
        action: HopAction,
        queue_delay_ms: u64,
        remaining_ttl: u8,
        next_hop: Option<RouterId>,
    ) -> Self {
        Self {
            router,
            action,
            queue_delay_ms,
            remaining_ttl,
            next_hop,
            timestamp: SystemTime::now(),
        }
    }

    #[must_use]
    pub fn router(&self) -> &RouterId {
        &self.router
    }

    #[must_use]
    pub const fn action(&self) -> HopAction {
        self.action
    }

    #[must_use]
    pub const fn queue_delay_ms(&self) -> u64 {
        self.queue_delay_ms
    }

    #[must_use]
    pub const fn remaining_ttl(&self) -> u8 {
        self.remaining_ttl
    }

    #[must_use]
    pub fn next_hop(&self) -> Option<&RouterId> {
        self.next_hop.as_ref()
    }

    #[must_use]
    pub const fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

/// The journey of one packet: an append-only trace plus the visited set.
///
/// Invariant: the visited set is exactly the set of router ids appearing
/// in the trace; [`PacketHistory::add_trace`] updates both before
/// returning.
#[derive(Debug)]
#[must_use]
pub struct PacketHistory {
    packet_id: PacketId,
    trace: Vec<TraceEntry>,
    visited: HashSet<RouterId>,
}

impl PacketHistory {
    pub fn new(packet_id: PacketId) -> Self {
        Self {
            packet_id,
            trace: Vec::new(),
            visited: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    /// Append a hop event and mark its router as visited.
    pub fn add_trace(&mut self, entry: TraceEntry) {
        self.visited.insert(entry.router.clone());
        self.trace.push(entry);
    }

    /// Whether the packet's trace already passed through `router`.
    #[must_use]
    pub fn has_visited(&self, router: &RouterId) -> bool {
        self.visited.contains(router)
    }

    /// Loop check: true iff `router` is already in the visited set.
    ///
    /// Must be called *before* the corresponding [`add_trace`] for the
    /// hop being decided; calling it after would make every router look
    /// like a loop on its second check.
    ///
    /// [`add_trace`]: PacketHistory::add_trace
    #[must_use]
    pub fn detect_loop(&self, router: &RouterId) -> bool {
        let looped = self.has_visited(router);
        if looped {
            tracing::debug!(
                packet_id = %self.packet_id,
                router = %router,
                "loop detected: router already visited"
            );
        }
        looped
    }

    /// Sum of queueing delay across all recorded hops, in milliseconds.
    #[must_use]
    pub fn total_delay_ms(&self) -> u64 {
        self.trace.iter().map(|e| e.queue_delay_ms).sum()
    }

    /// The outcome of the most recent hop, if any hop was recorded.
    #[must_use]
    pub fn final_action(&self) -> Option<HopAction> {
        self.trace.last().map(|e| e.action)
    }

    /// The router of the most recent hop, if any hop was recorded.
    #[must_use]
    pub fn last_router(&self) -> Option<&RouterId> {
        self.trace.last().map(|e| &e.router)
    }

    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.trace.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Iterate over trace entries in hop order.
    pub fn iter(&self) -> impl Iterator<Item = &TraceEntry> {
        self.trace.iter()
    }

    /// Empty both the trace and the visited set.
    pub fn clear(&mut self) {
        self.trace.clear();
        self.visited.clear();
    }
}
