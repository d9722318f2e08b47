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

//! # This module contains the read-only projections of the network state, consumed by
//! presentation layers. A snapshot is a deep, point-in-time copy: it never aliases the mutable
//! state it was extracted from, and it stays valid (and unchanged) while the network keeps
//! evolving.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    device::DeviceKind,
    forwarding::ForwardingEntry,
    metrics::TrafficSample,
    network::{Link, Network},
    switch::{Port, SwitchStats, Vlan},
    types::{DeviceId, LinkId, Phase},
};

/// Point-in-time copy of a single device, including the full switch state for switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// ID of the device.
    pub device_id: DeviceId,
    /// Kind of the device.
    pub kind: DeviceKind,
    /// Label of the device.
    pub label: String,
    /// Whether the device takes part in the running simulation.
    pub active: bool,
    /// The switch state; `Some` exactly for devices of kind [`DeviceKind::Switch`].
    pub switch: Option<SwitchSnapshot>,
}

/// Point-in-time copy of the state of one switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSnapshot {
    /// The ports, ordered by port number.
    pub ports: Vec<Port>,
    /// The VLANs, ordered by VLAN id.
    pub vlans: Vec<Vlan>,
    /// The forwarding table entries, ordered by MAC address.
    pub forwarding_table: Vec<ForwardingEntry>,
    /// The aggregate statistics.
    pub stats: SwitchStats,
}

/// Point-in-time copy of the entire network, extracted with
/// [`crate::network::Network::get_snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// All devices, ordered by id.
    pub devices: Vec<DeviceSnapshot>,
    /// All links, ordered by id.
    pub links: Vec<Link>,
    /// The phase the simulation was in when the snapshot was taken.
    pub phase: Phase,
    /// The metrics history at the time of the snapshot, oldest sample first.
    pub metrics: Vec<TrafficSample>,
}

impl NetworkSnapshot {
    /// Extract a snapshot from the network.
    pub fn from_net(net: &Network) -> Self {
        let devices = net
            .devices
            .values()
            .sorted_by_key(|d| d.device_id())
            .map(|d| DeviceSnapshot {
                device_id: d.device_id(),
                kind: d.kind(),
                label: d.label().to_string(),
                active: d.is_active(),
                switch: net.switches.get(&d.device_id()).map(SwitchSnapshot::from),
            })
            .collect();
        let links = net.links.values().sorted_by_key(|l| l.link_id()).cloned().collect();
        Self {
            devices,
            links,
            phase: net.phase,
            metrics: net.history.iter().cloned().collect(),
        }
    }

    /// Find a device in the snapshot by its id.
    pub fn get_device(&self, device: DeviceId) -> Option<&DeviceSnapshot> {
        self.devices.iter().find(|d| d.device_id == device)
    }

    /// Find a link in the snapshot by its id.
    pub fn get_link(&self, link: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.link_id() == link)
    }
}

impl From<&crate::switch::SwitchState> for SwitchSnapshot {
    fn from(state: &crate::switch::SwitchState) -> Self {
        Self {
            ports: state.ports().to_vec(),
            vlans: state.vlans().cloned().collect(),
            forwarding_table: state.table().iter().sorted_by_key(|e| e.mac).cloned().collect(),
            stats: *state.stats(),
        }
    }
}
