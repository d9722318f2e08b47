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

//! Module defining the devices of the topology.

use serde::{Deserialize, Serialize};

use crate::types::DeviceId;

/// The kind of a device. The kind is chosen at creation time and is immutable afterwards.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum DeviceKind {
    /// A router, forwarding traffic between network segments.
    Router,
    /// A switch, owning ports, VLANs, and a MAC forwarding table.
    Switch,
    /// An end host.
    Client,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Router => f.write_str("Router"),
            DeviceKind::Switch => f.write_str("Switch"),
            DeviceKind::Client => f.write_str("Client"),
        }
    }
}

/// A single device of the topology. The device only stores its identity and activation state.
/// Switch-specific state lives in [`crate::switch::SwitchState`], owned by the network in a
/// separate table that is kept in sync with the device table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Human-readable label of the device (not necessarily unique).
    label: String,
    /// ID of the device
    device_id: DeviceId,
    /// Kind of the device, immutable after creation.
    kind: DeviceKind,
    /// Whether the device currently takes part in the simulation. Set for all devices at once on
    /// phase transitions, and inherited from the current phase at creation.
    pub(crate) active: bool,
}

impl Device {
    pub(crate) fn new(label: String, device_id: DeviceId, kind: DeviceKind, active: bool) -> Self {
        Self {
            label,
            device_id,
            kind,
            active,
        }
    }

    /// Get the label of the device.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the ID of the device.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Get the kind of the device.
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns `true` while the simulation is running.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
