//! Strict-priority QoS scheduler with bounded admission queues.
//!
//! Packets are classified by destination port into three FIFO queues and
//! dequeued in strict priority order: Medium is served only when High is
//! empty, Low only when both are. Sustained High-priority load therefore
//! starves the lower classes indefinitely. That is the scheduling policy,
//! not a defect; callers wanting fairness need a different discipline.

use std::collections::VecDeque;

use routesim_core::{Packet, Priority};

/// Outcome of admitting one packet into its priority queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Enqueued into the queue for this priority.
    Accepted(Priority),
    /// The target queue was full; the packet was dropped at admission.
    Rejected(Priority),
}

/// Counts for one classification batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    pub enqueued: usize,
    pub dropped: usize,
}

/// Current occupancy of the three priority queues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueDepths {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The scheduler: three bounded FIFO queues, one per priority class.
///
/// Queue occupancy is the length of the backing deque, so the
/// counter-equals-length invariant holds by construction.
#[derive(Debug)]
#[must_use]
pub struct QosScheduler {
    high: VecDeque<Packet>,
    medium: VecDeque<Packet>,
    low: VecDeque<Packet>,
    max_queue_size: usize,
}

impl QosScheduler {
    /// Create a scheduler whose per-class queues each hold at most
    /// `max_queue_size` packets.
    pub fn new(max_queue_size: usize) -> Self {
        Self {
            high: VecDeque::new(),
            medium: VecDeque::new(),
            low: VecDeque::new(),
            max_queue_size,
        }
    }

    /// Classify one packet by destination port and admit it into the
    /// matching queue.
    ///
    /// If that queue already holds `max_queue_size` packets the packet is
    /// dropped at admission: not retried, not queued elsewhere. The drop
    /// is silent at the API level per the scheduler's contract; a debug
    /// event records it for diagnostics.
    pub fn enqueue(&mut self, mut packet: Packet) -> Admission {
        let priority = Priority::from_port(packet.port);
        packet.priority = Some(priority);

        let queue = match priority {
            Priority::High => &mut self.high,
            Priority::Medium => &mut self.medium,
            Priority::Low => &mut self.low,
        };

        if queue.len() >= self.max_queue_size {
            tracing::debug!(
                packet_id = %packet.id,
                %priority,
                max = self.max_queue_size,
                "queue full, dropping packet at admission"
            );
            return Admission::Rejected(priority);
        }

        queue.push_back(packet);
        Admission::Accepted(priority)
    }

    /// Classify and admit a batch of packets, preserving input order
    /// within each priority class.
    pub fn classify(&mut self, packets: impl IntoIterator<Item = Packet>) -> ClassifyStats {
        let mut stats = ClassifyStats::default();
        for packet in packets {
            match self.enqueue(packet) {
                Admission::Accepted(_) => stats.enqueued += 1,
                Admission::Rejected(_) => stats.dropped += 1,
            }
        }
        stats
    }

    /// Dequeue the next packet in strict priority order: the head of the
    /// High queue if non-empty, else Medium, else Low. Returns `None`
    /// when all queues are drained.
    pub fn next_packet(&mut self) -> Option<Packet> {
        self.high
            .pop_front()
            .or_else(|| self.medium.pop_front())
            .or_else(|| self.low.pop_front())
    }

    #[must_use]
    pub fn all_queues_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }

    /// Current per-class queue occupancy.
    #[must_use]
    pub fn depths(&self) -> QueueDepths {
        QueueDepths {
            high: self.high.len(),
            medium: self.medium.len(),
            low: self.low.len(),
        }
    }

    #[must_use]
    pub const fn max_queue_size(&self) -> usize {
        self.max_queue_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routesim_core::{Ipv4Address, PacketId};

    fn make_packet(id: u64, port: u16) -> Packet {
        Packet::new(
            PacketId::new(id),
            Ipv4Address::from_octets([10, 0, 0, 1]),
            Ipv4Address::from_octets([10, 0, 0, 2]),
            port,
            8,
        )
    }

    #[test]
    fn test_enqueue_assigns_priority() {
        let mut qos = QosScheduler::new(10);
        assert_eq!(qos.enqueue(make_packet(1, 80)), Admission::Accepted(Priority::High));
        assert_eq!(
            qos.enqueue(make_packet(2, 8080)),
            Admission::Accepted(Priority::Medium)
        );
        assert_eq!(
            qos.enqueue(make_packet(3, 50000)),
            Admission::Accepted(Priority::Low)
        );

        let packet = qos.next_packet().unwrap();
        assert_eq!(packet.priority, Some(Priority::High));
    }

    #[test]
    fn test_strict_priority_drain_order() {
        let mut qos = QosScheduler::new(10);
        // Interleave classes; FIFO within each class, High before Medium
        // before Low overall.
        qos.enqueue(make_packet(1, 60000)); // Low
        qos.enqueue(make_packet(2, 80)); // High
        qos.enqueue(make_packet(3, 2000)); // Medium
        qos.enqueue(make_packet(4, 22)); // High
        qos.enqueue(make_packet(5, 9000)); // Medium

        let drained: Vec<u64> = std::iter::from_fn(|| qos.next_packet())
            .map(|p| p.id.value())
            .collect();
        assert_eq!(drained, vec![2, 4, 3, 5, 1]);
        assert!(qos.all_queues_empty());
    }

    #[test]
    fn test_admission_bound() {
        let mut qos = QosScheduler::new(2);
        // Three High-priority packets; the third is dropped at admission.
        assert_eq!(qos.enqueue(make_packet(1, 80)), Admission::Accepted(Priority::High));
        assert_eq!(qos.enqueue(make_packet(2, 443)), Admission::Accepted(Priority::High));
        assert_eq!(qos.enqueue(make_packet(3, 22)), Admission::Rejected(Priority::High));

        assert_eq!(qos.depths().high, 2);
        assert!(!qos.all_queues_empty());

        assert_eq!(qos.next_packet().unwrap().id.value(), 1);
        assert!(!qos.all_queues_empty());
        assert_eq!(qos.next_packet().unwrap().id.value(), 2);
        assert!(qos.all_queues_empty());
        assert_eq!(qos.next_packet(), None);
    }

    #[test]
    fn test_queues_bounded_independently() {
        let mut qos = QosScheduler::new(1);
        assert_eq!(qos.enqueue(make_packet(1, 80)), Admission::Accepted(Priority::High));
        // A full High queue does not affect Medium admission
        assert_eq!(
            qos.enqueue(make_packet(2, 8080)),
            Admission::Accepted(Priority::Medium)
        );
        assert_eq!(qos.enqueue(make_packet(3, 443)), Admission::Rejected(Priority::High));
        assert_eq!(qos.depths(), QueueDepths { high: 1, medium: 1, low: 0 });
    }

    #[test]
    fn test_classify_batch_stats() {
        let mut qos = QosScheduler::new(2);
        let packets = vec![
            make_packet(1, 80),
            make_packet(2, 443),
            make_packet(3, 22), // High queue full
            make_packet(4, 2000),
        ];
        let stats = qos.classify(packets);
        assert_eq!(stats, ClassifyStats { enqueued: 3, dropped: 1 });
        assert_eq!(qos.depths(), QueueDepths { high: 2, medium: 1, low: 0 });
    }

    #[test]
    fn test_empty_scheduler() {
        let mut qos = QosScheduler::new(4);
        assert!(qos.all_queues_empty());
        assert_eq!(qos.next_packet(), None);
        assert_eq!(qos.depths(), QueueDepths::default());
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut qos = QosScheduler::new(0);
        assert_eq!(qos.enqueue(make_packet(1, 80)), Admission::Rejected(Priority::High));
        assert!(qos.all_queues_empty());
    }

    #[test]
    fn test_port_boundaries() {
        let mut qos = QosScheduler::new(10);
        assert_eq!(qos.enqueue(make_packet(1, 1023)), Admission::Accepted(Priority::High));
        assert_eq!(
            qos.enqueue(make_packet(2, 1024)),
            Admission::Accepted(Priority::Medium)
        );
        assert_eq!(
            qos.enqueue(make_packet(3, 49151)),
            Admission::Accepted(Priority::Medium)
        );
        assert_eq!(
            qos.enqueue(make_packet(4, 49152)),
            Admission::Accepted(Priority::Low)
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use routesim_core::{Ipv4Address, PacketId};

    fn make_packet(id: u64, port: u16) -> Packet {
        Packet::new(
            PacketId::new(id),
            Ipv4Address::from_bits(0x0A00_0001),
            Ipv4Address::from_bits(0x0A00_0002),
            port,
            8,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn depths_never_exceed_bound(
            ports in prop::collection::vec(any::<u16>(), 0..200),
            max in 0..16usize,
        ) {
            let mut qos = QosScheduler::new(max);
            for (i, port) in ports.iter().enumerate() {
                qos.enqueue(make_packet(i as u64 + 1, *port));
                let depths = qos.depths();
                prop_assert!(depths.high <= max);
                prop_assert!(depths.medium <= max);
                prop_assert!(depths.low <= max);
            }
        }

        #[test]
        fn drain_is_priority_sorted_and_fifo(
            ports in prop::collection::vec(any::<u16>(), 0..100),
        ) {
            let mut qos = QosScheduler::new(100);
            for (i, port) in ports.iter().enumerate() {
                qos.enqueue(make_packet(i as u64 + 1, *port));
            }

            let drained: Vec<Packet> = std::iter::from_fn(|| qos.next_packet()).collect();
            prop_assert!(qos.all_queues_empty());
            prop_assert_eq!(drained.len(), ports.len());

            // Priorities are monotonically non-increasing High→Medium→Low,
            // and ids within one class keep enqueue order.
            fn rank(p: &Packet) -> u8 {
                match p.priority.unwrap() {
                    Priority::High => 0,
                    Priority::Medium => 1,
                    Priority::Low => 2,
                }
            }
            for pair in drained.windows(2) {
                prop_assert!(rank(&pair[0]) <= rank(&pair[1]));
                if rank(&pair[0]) == rank(&pair[1]) {
                    prop_assert!(pair[0].id.value() < pair[1].id.value());
                }
            }
        }

        #[test]
        fn stats_match_depths(
            ports in prop::collection::vec(any::<u16>(), 0..100),
            max in 0..8usize,
        ) {
            let mut qos = QosScheduler::new(max);
            let packets: Vec<Packet> = ports
                .iter()
                .enumerate()
                .map(|(i, port)| make_packet(i as u64 + 1, *port))
                .collect();
            let total = packets.len();
            let stats = qos.classify(packets);
            let depths = qos.depths();
            prop_assert_eq!(stats.enqueued, depths.high + depths.medium + depths.low);
            prop_assert_eq!(stats.enqueued + stats.dropped, total);
        }
    }
}
