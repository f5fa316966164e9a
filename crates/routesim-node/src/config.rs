//! TOML-based configuration for the router driver.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use routesim_core::{Prefix, RouterId};
use routesim_dataplane::{RouteEntry, RoutingTable};

use crate::error::NodeError;

/// Top-level driver configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub router: RouterSection,
    #[serde(default)]
    pub routes: Vec<RouteSection>,
}

/// The `[router]` section.
#[derive(Debug, Deserialize)]
pub struct RouterSection {
    /// Identifier this router records in packet traces.
    #[serde(default = "default_router_id")]
    pub id: String,
    /// Per-class bound on the priority queues.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
    /// Path to the packet input file.
    pub input: Option<PathBuf>,
}

/// A `[[routes]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSection {
    /// Network prefix in `a.b.c.d/len` form.
    pub prefix: String,
    pub next_hop: String,
    #[serde(default = "default_metric")]
    pub metric: u32,
}

fn default_router_id() -> String {
    "R1".to_string()
}

fn default_max_queue_size() -> usize {
    10
}

fn default_metric() -> u32 {
    1
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            id: default_router_id(),
            max_queue_size: default_max_queue_size(),
            input: None,
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(format!("failed to parse config: {e}")))
    }

    /// Build the routing table from the `[[routes]]` entries.
    ///
    /// A malformed prefix fails configuration; routes are never silently
    /// dropped or mangled.
    pub fn build_routing_table(&self) -> Result<RoutingTable, NodeError> {
        let mut table = RoutingTable::new();
        for route in &self.routes {
            let prefix: Prefix = route.prefix.parse().map_err(|e| {
                NodeError::Config(format!("invalid route prefix '{}': {e}", route.prefix))
            })?;
            table.add_route(RouteEntry::new(
                prefix,
                RouterId::from(route.next_hop.as_str()),
                route.metric,
            ));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::parse("").unwrap();
        assert_eq!(config.router.id, "R1");
        assert_eq!(config.router.max_queue_size, 10);
        assert!(config.router.input.is_none());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = NodeConfig::parse(
            r#"
            [router]
            id = "Core_1"
            max_queue_size = 4
            input = "packets.csv"

            [[routes]]
            prefix = "192.168.1.0/24"
            next_hop = "Router_A"

            [[routes]]
            prefix = "0.0.0.0/0"
            next_hop = "DefaultGateway"
            metric = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.router.id, "Core_1");
        assert_eq!(config.router.max_queue_size, 4);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].metric, 1); // default
        assert_eq!(config.routes[1].metric, 10);

        let table = config.build_routing_table().unwrap();
        assert_eq!(table.route_count(), 2);
    }

    #[test]
    fn test_bad_prefix_fails_configuration() {
        let config = NodeConfig::parse(
            r#"
            [[routes]]
            prefix = "192.168.1.0/33"
            next_hop = "Router_A"
            "#,
        )
        .unwrap();

        let err = config.build_routing_table().unwrap_err();
        assert!(err.to_string().contains("192.168.1.0/33"));
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let err = NodeConfig::parse("[router").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }
}
