//! Routing table with longest-prefix-match lookup.

use std::collections::BTreeMap;

use routesim_core::{Ipv4Address, Prefix, RouterId};

/// One routing rule: a network prefix, the next hop to forward matching
/// traffic to, and a preference metric (lower is preferred among equally
/// specific routes). Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RouteEntry {
    prefix: Prefix,
    next_hop: RouterId,
    metric: u32,
}

impl RouteEntry {
    pub fn new(prefix: Prefix, next_hop: RouterId, metric: u32) -> Self {
        Self {
            prefix,
            next_hop,
            metric,
        }
    }

    #[must_use]
    pub const fn prefix(&self) -> Prefix {
        self.prefix
    }

    #[must_use]
    pub fn next_hop(&self) -> &RouterId {
        &self.next_hop
    }

    #[must_use]
    pub const fn metric(&self) -> u32 {
        self.metric
    }
}

/// Routing table keyed by prefix.
///
/// Backed by a `BTreeMap` so iteration order is deterministic for a fixed
/// table, which makes the final lookup tie-break (after prefix length and
/// metric) stable across runs.
#[derive(Debug, Default)]
#[must_use]
pub struct RoutingTable {
    routes: BTreeMap<Prefix, RouteEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Insert a route, replacing any existing route for the same prefix.
    ///
    /// Returns the replaced entry, if any. Malformed prefixes cannot reach
    /// this point: constructing a [`Prefix`] already validates the address
    /// and the [0, 32] length range.
    pub fn add_route(&mut self, entry: RouteEntry) -> Option<RouteEntry> {
        self.routes.insert(entry.prefix, entry)
    }

    /// Remove the route for a prefix. Returns `None` if absent; a missing
    /// route is reported, not fatal.
    pub fn remove_route(&mut self, prefix: &Prefix) -> Option<RouteEntry> {
        self.routes.remove(prefix)
    }

    /// Longest-prefix-match lookup.
    ///
    /// Scans every entry whose prefix contains `dest` and selects the one
    /// with the greatest prefix length; among equally long matches the one
    /// with the lowest metric wins, and any remaining tie goes to the
    /// first entry in table order. Returns an owned copy so the result
    /// stays valid across later table mutations.
    ///
    /// The scan is O(routes), which is fine at the table sizes this
    /// simulator targets (tens of entries).
    #[must_use]
    pub fn find_best_route(&self, dest: Ipv4Address) -> Option<RouteEntry> {
        let mut best: Option<&RouteEntry> = None;
        for entry in self.routes.values() {
            if !entry.prefix.contains(dest) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    entry.prefix.len() > current.prefix.len()
                        || (entry.prefix.len() == current.prefix.len()
                            && entry.metric < current.metric)
                }
            };
            if better {
                best = Some(entry);
            }
        }
        best.cloned()
    }

    /// Look up a route by its exact prefix.
    #[must_use]
    pub fn get(&self, prefix: &Prefix) -> Option<&RouteEntry> {
        self.routes.get(prefix)
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over all routes in deterministic prefix order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.values()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_prefix() -> impl Strategy<Value = Prefix> {
        (any::<u32>(), 0..=32u8)
            .prop_map(|(bits, len)| Prefix::new(Ipv4Address::from_bits(bits), len).unwrap())
    }

    fn arb_entry() -> impl Strategy<Value = RouteEntry> {
        (arb_prefix(), 0..8u32, 0..100u32).prop_map(|(prefix, hop, metric)| {
            RouteEntry::new(prefix, RouterId::new(format!("R{hop}")), metric)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn best_route_is_maximal(
            entries in prop::collection::vec(arb_entry(), 0..40),
            dest_bits in any::<u32>(),
        ) {
            let mut table = RoutingTable::new();
            for entry in entries {
                table.add_route(entry);
            }
            let dest = Ipv4Address::from_bits(dest_bits);

            match table.find_best_route(dest) {
                None => {
                    // No stored entry may match
                    prop_assert!(table.iter().all(|e| !e.prefix().contains(dest)));
                }
                Some(best) => {
                    prop_assert!(best.prefix().contains(dest));
                    for entry in table.iter().filter(|e| e.prefix().contains(dest)) {
                        // No match is more specific
                        prop_assert!(entry.prefix().len() <= best.prefix().len());
                        // No equally specific match has a lower metric
                        if entry.prefix().len() == best.prefix().len() {
                            prop_assert!(best.metric() <= entry.metric());
                        }
                    }
                }
            }
        }

        #[test]
        fn lookup_is_deterministic(
            entries in prop::collection::vec(arb_entry(), 0..40),
            dest_bits in any::<u32>(),
        ) {
            let mut table = RoutingTable::new();
            for entry in entries {
                table.add_route(entry);
            }
            let dest = Ipv4Address::from_bits(dest_bits);
            prop_assert_eq!(table.find_best_route(dest), table.find_best_route(dest));
        }

        #[test]
        fn default_route_guarantees_a_match(
            entries in prop::collection::vec(arb_entry(), 0..40),
            dest_bits in any::<u32>(),
        ) {
            let mut table = RoutingTable::new();
            for entry in entries {
                table.add_route(entry);
            }
            let default = Prefix::new(Ipv4Address::from_bits(0), 0).unwrap();
            table.add_route(RouteEntry::new(default, RouterId::from("Default"), 100));
            let dest = Ipv4Address::from_bits(dest_bits);
            prop_assert!(table.find_best_route(dest).is_some());
        }
    }
}
