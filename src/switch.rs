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

//! Module defining the per-switch state: ports, VLANs, and aggregate statistics.

use std::collections::{BTreeMap, BTreeSet};

use log::*;
use serde::{Deserialize, Serialize};

use crate::forwarding::ForwardingTable;
use crate::types::{DeviceId, MacAddress, PortId, SwitchError, VlanId};

/// Number of ports a switch is created with.
pub const DEFAULT_PORT_COUNT: PortId = 4;

/// The id of the default VLAN. Every switch owns this VLAN from creation, it cannot be deleted,
/// and ports removed from any other VLAN fall back to it.
pub const DEFAULT_VLAN: VlanId = 1;

/// Administrative status of a port.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PortStatus {
    /// The port is up.
    Active,
    /// The port is administratively down.
    Inactive,
    /// The port is in a fault state. This state is reserved for external fault injection; it is
    /// never entered or left by [`crate::network::Network::toggle_port`].
    Error,
}

impl std::fmt::Display for PortStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortStatus::Active => f.write_str("active"),
            PortStatus::Inactive => f.write_str("inactive"),
            PortStatus::Error => f.write_str("error"),
        }
    }
}

/// Negotiated speed of a port.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PortSpeed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    Mbps100,
    /// 1 Gbps
    #[default]
    Gbps1,
    /// 10 Gbps
    Gbps10,
}

impl std::fmt::Display for PortSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSpeed::Mbps10 => f.write_str("10M"),
            PortSpeed::Mbps100 => f.write_str("100M"),
            PortSpeed::Gbps1 => f.write_str("1G"),
            PortSpeed::Gbps10 => f.write_str("10G"),
        }
    }
}

/// A physical port of a switch. The set of ports is fixed when the switch is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port number, starting at 1.
    id: PortId,
    /// Administrative status.
    pub(crate) status: PortStatus,
    /// Negotiated speed.
    pub(crate) speed: PortSpeed,
    /// The device attached to this port, if any. Maintained by the network when links to this
    /// switch are created and removed.
    pub(crate) connected_device: Option<DeviceId>,
    /// The VLAN this port belongs to. Every port belongs to exactly one VLAN at all times; this
    /// field and [`Vlan::ports`] are kept consistent.
    pub(crate) vlan: VlanId,
}

impl Port {
    fn new(id: PortId) -> Self {
        Self {
            id,
            status: PortStatus::Inactive,
            speed: PortSpeed::default(),
            connected_device: None,
            vlan: DEFAULT_VLAN,
        }
    }

    /// Get the port number.
    pub fn id(&self) -> PortId {
        self.id
    }

    /// Get the administrative status of the port.
    pub fn status(&self) -> PortStatus {
        self.status
    }

    /// Get the negotiated speed of the port.
    pub fn speed(&self) -> PortSpeed {
        self.speed
    }

    /// Get the device attached to this port, if any.
    pub fn connected_device(&self) -> Option<DeviceId> {
        self.connected_device
    }

    /// Get the VLAN this port belongs to.
    pub fn vlan(&self) -> VlanId {
        self.vlan
    }
}

/// A VLAN of a switch: a named group of ports isolating a forwarding domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    /// VLAN id, unique per switch and strictly positive.
    id: VlanId,
    /// Human-readable name.
    name: String,
    /// The ports that are members of this VLAN.
    pub(crate) ports: BTreeSet<PortId>,
}

impl Vlan {
    fn new(id: VlanId, name: String) -> Self {
        Self {
            id,
            name,
            ports: BTreeSet::new(),
        }
    }

    /// Get the VLAN id.
    pub fn id(&self) -> VlanId {
        self.id
    }

    /// Get the name of the VLAN.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the member ports of the VLAN.
    pub fn ports(&self) -> &BTreeSet<PortId> {
        &self.ports
    }
}

/// Synthetic aggregate statistics of a switch, refreshed on every tick while the switch is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwitchStats {
    /// Current throughput in Mbps.
    pub throughput_mbps: f64,
    /// Current utilization in percent.
    pub utilization: f64,
    /// Number of errors observed since the switch was created.
    pub errors: u64,
}

/// State owned by every switch device: the fixed port sequence, the VLAN table, the MAC
/// forwarding table, and aggregate statistics.
///
/// A `SwitchState` is created together with its device and always fully initialized: VLAN 1
/// ("Default") exists from the start and contains all ports. A switch without VLAN 1 is a
/// violated invariant and treated as a programming error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchState {
    /// The ports of the switch, ordered by port number.
    pub(crate) ports: Vec<Port>,
    /// All VLANs of the switch, keyed (and ordered) by VLAN id.
    pub(crate) vlans: BTreeMap<VlanId, Vlan>,
    /// The MAC forwarding table.
    pub(crate) table: ForwardingTable,
    /// Aggregate statistics.
    pub(crate) stats: SwitchStats,
}

impl Default for SwitchState {
    fn default() -> Self {
        Self::new(DEFAULT_PORT_COUNT)
    }
}

impl SwitchState {
    /// Create a new switch state with `num_ports` inactive 1G ports, all members of VLAN 1.
    pub fn new(num_ports: PortId) -> Self {
        let ports: Vec<Port> = (1..=num_ports).map(Port::new).collect();
        let mut default_vlan = Vlan::new(DEFAULT_VLAN, String::from("Default"));
        default_vlan.ports.extend(ports.iter().map(Port::id));
        Self {
            ports,
            vlans: BTreeMap::from([(DEFAULT_VLAN, default_vlan)]),
            table: ForwardingTable::default(),
            stats: SwitchStats::default(),
        }
    }

    /// Get the ports of the switch, ordered by port number.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Get a single port by its number.
    pub fn get_port(&self, port: PortId) -> Option<&Port> {
        // port numbers start at 1 and are contiguous
        self.ports.get(port.checked_sub(1)? as usize)
    }

    /// Iterate over all VLANs, ordered by VLAN id.
    pub fn vlans(&self) -> impl Iterator<Item = &Vlan> {
        self.vlans.values()
    }

    /// Get a single VLAN by its id.
    pub fn get_vlan(&self, vlan: VlanId) -> Option<&Vlan> {
        self.vlans.get(&vlan)
    }

    /// Get the MAC forwarding table.
    pub fn table(&self) -> &ForwardingTable {
        &self.table
    }

    /// Get the aggregate statistics.
    pub fn stats(&self) -> &SwitchStats {
        &self.stats
    }

    /// Count the ports that are currently up.
    pub fn num_active_ports(&self) -> usize {
        self.ports
            .iter()
            .filter(|p| p.status == PortStatus::Active)
            .count()
    }

    fn get_port_mut(&mut self, port: PortId) -> Result<&mut Port, SwitchError> {
        port.checked_sub(1)
            .and_then(|idx| self.ports.get_mut(idx as usize))
            .ok_or(SwitchError::PortNotFound(port))
    }

    /// Flip a port between `Active` and `Inactive`. A port in the `Error` state is left
    /// untouched, and its current status is returned.
    pub(crate) fn toggle_port(&mut self, port: PortId) -> Result<PortStatus, SwitchError> {
        let port = self.get_port_mut(port)?;
        port.status = match port.status {
            PortStatus::Active => PortStatus::Inactive,
            PortStatus::Inactive => PortStatus::Active,
            PortStatus::Error => PortStatus::Error,
        };
        Ok(port.status)
    }

    /// Set the speed of a port.
    pub(crate) fn set_port_speed(
        &mut self,
        port: PortId,
        speed: PortSpeed,
    ) -> Result<(), SwitchError> {
        self.get_port_mut(port)?.speed = speed;
        Ok(())
    }

    /// Create a new VLAN without any member ports.
    pub(crate) fn create_vlan(
        &mut self,
        vlan_id: VlanId,
        name: impl Into<String>,
    ) -> Result<(), SwitchError> {
        if vlan_id == 0 {
            return Err(SwitchError::InvalidVlanId(vlan_id));
        }
        if self.vlans.contains_key(&vlan_id) {
            return Err(SwitchError::DuplicateVlan(vlan_id));
        }
        self.vlans.insert(vlan_id, Vlan::new(vlan_id, name.into()));
        Ok(())
    }

    /// Delete a VLAN, explicitly reassigning all its member ports to VLAN 1.
    pub(crate) fn delete_vlan(&mut self, vlan_id: VlanId) -> Result<(), SwitchError> {
        if vlan_id == DEFAULT_VLAN {
            return Err(SwitchError::ProtectedVlan);
        }
        let removed = self
            .vlans
            .remove(&vlan_id)
            .ok_or(SwitchError::VlanNotFound(vlan_id))?;

        // explicit fallback: every port must belong to exactly one VLAN at all times.
        for port_id in removed.ports.iter().copied() {
            if let Ok(port) = self.get_port_mut(port_id) {
                port.vlan = DEFAULT_VLAN;
            }
        }
        self.vlans
            .get_mut(&DEFAULT_VLAN)
            .unwrap_or_else(|| unreachable!("VLAN 1 must exist on every switch"))
            .ports
            .extend(removed.ports);
        Ok(())
    }

    /// Move a port into the given VLAN, removing it from its current one.
    pub(crate) fn assign_port_to_vlan(
        &mut self,
        port_id: PortId,
        vlan_id: VlanId,
    ) -> Result<(), SwitchError> {
        if !self.vlans.contains_key(&vlan_id) {
            return Err(SwitchError::VlanNotFound(vlan_id));
        }
        let old_vlan = {
            let port = self.get_port_mut(port_id)?;
            let old = port.vlan;
            port.vlan = vlan_id;
            old
        };
        if let Some(vlan) = self.vlans.get_mut(&old_vlan) {
            vlan.ports.remove(&port_id);
        }
        self.vlans
            .get_mut(&vlan_id)
            .unwrap_or_else(|| unreachable!("presence was checked above"))
            .ports
            .insert(port_id);
        Ok(())
    }

    /// Learn a MAC address on the given port, resetting its age.
    pub(crate) fn learn(&mut self, mac: MacAddress, port: PortId) -> Result<(), SwitchError> {
        if self.get_port(port).is_none() {
            return Err(SwitchError::PortNotFound(port));
        }
        self.table.learn(mac, port);
        Ok(())
    }

    /// Record `device` on the first free port, if any. Called when a link to this switch is
    /// created.
    pub(crate) fn attach_device(&mut self, device: DeviceId) -> Option<PortId> {
        let port = self.ports.iter_mut().find(|p| p.connected_device.is_none())?;
        port.connected_device = Some(device);
        trace!("Attached {device:?} to port {}", port.id);
        Some(port.id)
    }

    /// Release the first port holding `device`. Called when a link to this switch is removed.
    pub(crate) fn detach_device(&mut self, device: DeviceId) -> Option<PortId> {
        let port = self
            .ports
            .iter_mut()
            .find(|p| p.connected_device == Some(device))?;
        port.connected_device = None;
        trace!("Detached {device:?} from port {}", port.id);
        Some(port.id)
    }
}
