//! The per-hop forwarding decision as a pure, stateless function.
//!
//! Pulls the TTL check, loop check, and route lookup out of the driver
//! loop so the decision order is testable in isolation. The caller owns
//! all mutation: it decrements the TTL before calling and records the
//! matching trace entry after.

use routesim_core::{Packet, RouterId};

use crate::history::{DropReason, PacketHistory};
use crate::routing::RoutingTable;

/// The forwarding decision for one hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopOutcome {
    /// Forward to the next hop selected by longest-prefix match.
    Forward { next_hop: RouterId },
    /// Stop forwarding this packet. Loop and drop outcomes are terminal
    /// for the packet's journey.
    Drop(DropReason),
}

/// Decide what happens to `packet` at router `local`.
///
/// Expects the caller to have already decremented the TTL for this hop.
/// Checks run in pipeline order:
///
/// 1. an exhausted TTL drops the packet;
/// 2. a repeat visit to `local` (checked against `history` *before* the
///    hop's trace entry is recorded) drops it as a loop;
/// 3. a failed route lookup drops it as unroutable;
/// 4. otherwise the packet is forwarded to the matched next hop.
#[must_use]
pub fn decide_hop(
    packet: &Packet,
    table: &RoutingTable,
    history: &PacketHistory,
    local: &RouterId,
) -> HopOutcome {
    if packet.ttl_expired() {
        return HopOutcome::Drop(DropReason::TtlExpired);
    }

    if history.detect_loop(local) {
        return HopOutcome::Drop(DropReason::Loop);
    }

    match table.find_best_route(packet.destination) {
        Some(route) => {
            tracing::debug!(
                packet_id = %packet.id,
                destination = %packet.destination,
                prefix = %route.prefix(),
                next_hop = %route.next_hop(),
                "route selected"
            );
            HopOutcome::Forward {
                next_hop: route.next_hop().clone(),
            }
        }
        None => HopOutcome::Drop(DropReason::NoRoute),
    }
}
