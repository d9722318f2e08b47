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

//! Module for defining the change notifications emitted by the network.
//!
//! Presentation layers subscribe via [`crate::network::Network::subscribe`] and receive one
//! [`NetworkEvent`] per state change, so they can update incrementally instead of polling
//! [`crate::network::Network::get_snapshot`].

use serde::{Deserialize, Serialize};

use crate::metrics::TrafficSample;
use crate::types::{DeviceId, LinkId, Phase};

/// A change notification emitted by the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetworkEvent {
    /// A device was added to the topology.
    DeviceAdded(DeviceId),
    /// A device (and, by cascade, all its links) was removed from the topology.
    DeviceRemoved(DeviceId),
    /// A link was added to the topology.
    LinkAdded(LinkId),
    /// A link was removed from the topology.
    LinkRemoved(LinkId),
    /// The simulation controller changed its phase.
    PhaseChanged(Phase),
    /// One simulation tick completed, producing the given sample.
    TickCompleted(TrafficSample),
}
