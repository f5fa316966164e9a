//! Core types for the routesim single-router data-plane simulator.
//!
//! This crate defines the address and prefix newtypes with their parsing
//! contracts, the packet record, and the service-priority classification
//! used by the scheduler and routing layers.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod packet;
pub mod types;

pub use error::AddressError;
pub use packet::{Packet, PacketId, Priority};
pub use types::{Ipv4Address, Prefix, RouterId};
