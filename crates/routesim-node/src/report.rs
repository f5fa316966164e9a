//! Human-readable rendering of run results.
//!
//! Everything in this module only consumes plain data produced by the
//! pipeline; no decision logic lives here.

use std::fmt::Write;

use routesim_dataplane::{PacketHistory, RoutingTable};

use crate::node::RunReport;

/// Render the routing table, one route per line in table order.
#[must_use]
pub fn render_routing_table(table: &RoutingTable) -> String {
    let mut out = format!("Routing Table ({} routes):\n", table.route_count());
    if table.is_empty() {
        out.push_str("  no routes configured\n");
        return out;
    }
    for entry in table.iter() {
        let _ = writeln!(
            out,
            "  {} -> {} (metric {})",
            entry.prefix(),
            entry.next_hop(),
            entry.metric()
        );
    }
    out
}

/// Render the full hop-by-hop history for one packet.
#[must_use]
pub fn render_history(history: &PacketHistory) -> String {
    let mut out = format!("Packet {} history:\n", history.packet_id());
    if history.is_empty() {
        out.push_str("  no trace entries recorded\n");
        return out;
    }
    for (i, entry) in history.iter().enumerate() {
        let next_hop = entry
            .next_hop()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let _ = writeln!(
            out,
            "  hop #{}: {} [{}] delay {}ms, TTL {}, next hop {}",
            i + 1,
            entry.router(),
            entry.action(),
            entry.queue_delay_ms(),
            entry.remaining_ttl(),
            next_hop
        );
    }
    let final_action = history
        .final_action()
        .map_or_else(|| "UNKNOWN".to_string(), |a| a.to_string());
    let _ = writeln!(
        out,
        "  total: {} hops, {}ms delay, final action {}",
        history.hop_count(),
        history.total_delay_ms(),
        final_action
    );
    out
}

/// Render a one-line summary of a packet's journey:
/// `Packet 3: R1 => R2 [FORWARDED, 2 hops, 7ms]`.
#[must_use]
pub fn render_compact_history(history: &PacketHistory) -> String {
    if history.is_empty() {
        return format!("Packet {}: no history", history.packet_id());
    }
    let path: Vec<&str> = history.iter().map(|e| e.router().as_str()).collect();
    let final_action = history
        .final_action()
        .map_or_else(|| "UNKNOWN".to_string(), |a| a.to_string());
    format!(
        "Packet {}: {} [{}, {} hops, {}ms]",
        history.packet_id(),
        path.join(" => "),
        final_action,
        history.hop_count(),
        history.total_delay_ms()
    )
}

/// Render the processing summary for a run.
#[must_use]
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::from("--- Processing Summary ---\n");
    let _ = writeln!(out, "Dequeued:           {}", report.total_dequeued);
    let _ = writeln!(out, "Forwarded:          {}", report.forwarded);
    let _ = writeln!(out, "Dropped (TTL):      {}", report.dropped_ttl);
    let _ = writeln!(out, "Dropped (no route): {}", report.dropped_no_route);
    let _ = writeln!(out, "Dropped (loop):     {}", report.dropped_loop);
    let _ = writeln!(out, "Dropped (admission):{}", report.admission_dropped);
    for history in report.histories.values() {
        let _ = writeln!(out, "{}", render_compact_history(history));
    }
    out
}
