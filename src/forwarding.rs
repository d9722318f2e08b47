// LanSim: Interactive LAN Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Module containing the per-switch MAC forwarding table with aging and eviction.

use std::collections::HashMap;
use std::time::Duration;

use log::*;
use serde::{Deserialize, Serialize};

use crate::types::{MacAddress, PortId};

/// Entries older than this are evicted from the forwarding table (unless configured otherwise).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

/// A single learned address: the port a MAC address was last seen on, and how long ago that was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingEntry {
    /// The learned MAC address.
    pub mac: MacAddress,
    /// The port the address was last seen on.
    pub port: PortId,
    /// Time since the address was last seen.
    pub age: Duration,
}

/// The MAC forwarding table of a single switch.
///
/// The table holds at most one entry per MAC address (last-seen wins). Learning an address
/// resets its age to zero; [`ForwardingTable::age`] advances the age of every entry and evicts
/// those older than the configured maximum. Aging is deterministic: given a fixed sequence of
/// learn events and age steps, the table contents are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingTable {
    entries: HashMap<MacAddress, ForwardingEntry>,
    max_age: Duration,
}

impl Default for ForwardingTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}

impl ForwardingTable {
    /// Create an empty forwarding table with the given maximum entry age.
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_age,
        }
    }

    /// Get the maximum entry age before eviction.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Get the number of learned addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no address is learned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a MAC address.
    pub fn get(&self, mac: &MacAddress) -> Option<&ForwardingEntry> {
        self.entries.get(mac)
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ForwardingEntry> {
        self.entries.values()
    }

    /// Insert or refresh an entry, resetting its age to zero.
    pub(crate) fn learn(&mut self, mac: MacAddress, port: PortId) {
        trace!("Learn {mac} on port {port}");
        self.entries.insert(
            mac,
            ForwardingEntry {
                mac,
                port,
                age: Duration::ZERO,
            },
        );
    }

    /// Age every entry by `elapsed` and evict all entries older than the maximum age.
    pub(crate) fn age(&mut self, elapsed: Duration) {
        let max_age = self.max_age;
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            entry.age += elapsed;
            entry.age <= max_age
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!("Evicted {evicted} forwarding entries older than {max_age:?}");
        }
    }
}
