//! Pipeline orchestration: classify, dequeue, decide, record.

use std::collections::BTreeMap;
use std::time::Instant;

use routesim_core::{Packet, PacketId, RouterId};
use routesim_dataplane::{
    decide_hop, ClassifyStats, HopAction, HopOutcome, PacketHistory, QosScheduler, QueueDepths,
    RoutingTable, TraceEntry,
};

use crate::config::NodeConfig;
use crate::error::NodeError;

/// Totals and per-packet histories from one processing run.
#[derive(Debug)]
pub struct RunReport {
    pub total_dequeued: usize,
    pub forwarded: usize,
    pub dropped_ttl: usize,
    pub dropped_no_route: usize,
    pub dropped_loop: usize,
    /// Packets rejected at admission because their queue was full.
    pub admission_dropped: usize,
    pub final_depths: QueueDepths,
    /// Per-packet hop histories, keyed by packet id.
    pub histories: BTreeMap<PacketId, PacketHistory>,
}

impl RunReport {
    #[must_use]
    pub fn total_dropped(&self) -> usize {
        self.dropped_ttl + self.dropped_no_route + self.dropped_loop
    }
}

/// One simulated router: the scheduler, the routing table, and the
/// per-packet histories, driven synchronously to completion.
#[derive(Debug)]
#[must_use]
pub struct Node {
    router_id: RouterId,
    table: RoutingTable,
    qos: QosScheduler,
}

impl Node {
    pub fn new(router_id: RouterId, table: RoutingTable, max_queue_size: usize) -> Self {
        Self {
            router_id,
            table,
            qos: QosScheduler::new(max_queue_size),
        }
    }

    /// Build a node from configuration. Fails if any configured route has
    /// a malformed prefix.
    pub fn from_config(config: &NodeConfig) -> Result<Self, NodeError> {
        let table = config.build_routing_table()?;
        Ok(Self::new(
            RouterId::from(config.router.id.as_str()),
            table,
            config.router.max_queue_size,
        ))
    }

    #[must_use]
    pub fn routing_table(&self) -> &RoutingTable {
        &self.table
    }

    #[must_use]
    pub fn router_id(&self) -> &RouterId {
        &self.router_id
    }

    /// Run the full pipeline over a batch of packets.
    ///
    /// Classifies everything into the priority queues, then drains them in
    /// strict priority order. Per dequeued packet: decrement the TTL,
    /// decide the hop (TTL, loop, route lookup — loop check precedes the
    /// trace recording), record the trace entry, and tally the outcome.
    pub fn process(&mut self, packets: Vec<Packet>) -> RunReport {
        let stats: ClassifyStats = self.qos.classify(packets);
        tracing::info!(
            enqueued = stats.enqueued,
            admission_dropped = stats.dropped,
            "classification complete"
        );

        let mut report = RunReport {
            total_dequeued: 0,
            forwarded: 0,
            dropped_ttl: 0,
            dropped_no_route: 0,
            dropped_loop: 0,
            admission_dropped: stats.dropped,
            final_depths: QueueDepths::default(),
            histories: BTreeMap::new(),
        };

        // Queueing delay is measured from the end of classification to
        // each packet's dequeue.
        let admitted_at = Instant::now();

        while let Some(mut packet) = self.qos.next_packet() {
            report.total_dequeued += 1;
            packet.decrement_ttl();

            let queue_delay_ms = admitted_at.elapsed().as_millis() as u64;
            let history = report
                .histories
                .entry(packet.id)
                .or_insert_with(|| PacketHistory::new(packet.id));

            let outcome = decide_hop(&packet, &self.table, history, &self.router_id);
            let (action, next_hop) = match outcome {
                HopOutcome::Forward { next_hop } => {
                    report.forwarded += 1;
                    (HopAction::Forwarded, Some(next_hop))
                }
                HopOutcome::Drop(reason) => {
                    use routesim_dataplane::DropReason;
                    match reason {
                        DropReason::TtlExpired => report.dropped_ttl += 1,
                        DropReason::NoRoute => report.dropped_no_route += 1,
                        DropReason::Loop => report.dropped_loop += 1,
                    }
                    (HopAction::Dropped(reason), None)
                }
            };

            history.add_trace(TraceEntry::new(
                self.router_id.clone(),
                action,
                queue_delay_ms,
                packet.ttl,
                next_hop,
            ));
        }

        report.final_depths = self.qos.depths();
        tracing::info!(
            dequeued = report.total_dequeued,
            forwarded = report.forwarded,
            dropped = report.total_dropped(),
            "run complete"
        );
        report
    }
}
