//! Driver for the routesim data-plane.
//!
//! This crate is the external collaborator around the algorithmic core:
//! it loads TOML configuration, parses the packet input file, runs the
//! classify/dequeue/route pipeline, and renders human-readable reports.
//! All decision logic lives in `routesim-dataplane`; everything here
//! consumes plain result values.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod node;
pub mod report;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{Node, RunReport};
