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

//! Convenient re-export of the types needed to build and simulate a network.

pub use crate::device::{Device, DeviceKind};
pub use crate::event::NetworkEvent;
pub use crate::formatter::NetworkFormatter;
pub use crate::forwarding::{ForwardingEntry, ForwardingTable, DEFAULT_MAX_AGE};
pub use crate::metrics::{MetricsHistory, TrafficSample, METRICS_HISTORY_CAPACITY};
pub use crate::network::{Link, Network, DEFAULT_TICK_INTERVAL};
pub use crate::session::SimulationSession;
pub use crate::snapshot::{DeviceSnapshot, NetworkSnapshot, SwitchSnapshot};
pub use crate::switch::{
    Port, PortSpeed, PortStatus, SwitchState, SwitchStats, Vlan, DEFAULT_PORT_COUNT, DEFAULT_VLAN,
};
pub use crate::types::{
    DeviceId, LinkId, MacAddress, NetworkError, ParseMacError, Phase, PortId, SwitchError, VlanId,
};
