//! Data-plane decision logic for a single simulated router.
//!
//! This crate contains the three algorithmic components of the router:
//! the routing table with longest-prefix-match lookup, the strict-priority
//! QoS scheduler with bounded admission queues, and the per-packet trace
//! history with forwarding-loop detection. The per-hop forwarding decision
//! that ties them together lives in [`forward`] as a pure function; all
//! orchestration and reporting is left to the caller.

pub mod forward;
pub mod history;
pub mod qos;
pub mod routing;

pub use forward::{decide_hop, HopOutcome};
pub use history::{DropReason, HopAction, PacketHistory, TraceEntry};
pub use qos::{Admission, ClassifyStats, QosScheduler, QueueDepths};
pub use routing::{RouteEntry, RoutingTable};
