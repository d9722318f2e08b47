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

//! Module containing all type definitions

use petgraph::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod mac;
pub use mac::{MacAddress, ParseMacError};

pub(crate) type IndexType = u32;
/// Device Identification (and index into the topology graph)
pub type DeviceId = NodeIndex<IndexType>;
/// Link Identification (and index into the edge set of the topology graph)
pub type LinkId = EdgeIndex<IndexType>;
/// Port identifier on a switch. Ports are numbered starting at 1.
pub type PortId = u8;
/// VLAN identifier. Valid VLAN ids are strictly positive.
pub type VlanId = u32;

/// Topology graph. Links are undirected, and parallel links between the same pair of devices are
/// allowed (trunking). Node and edge payloads live in the device and link tables of the network.
pub(crate) type TopologyGraph = StableGraph<(), (), Undirected, IndexType>;

/// Phase of the simulation controller.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum Phase {
    /// The simulation is not running, and no metrics are retained. This is the initial phase.
    #[default]
    Stopped,
    /// The simulation is running, and the clock produces one sample per tick.
    Running,
    /// The simulation is halted, but all devices remain active and all metrics are retained.
    Paused,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Stopped => f.write_str("Stopped"),
            Phase::Running => f.write_str("Running"),
            Phase::Paused => f.write_str("Paused"),
        }
    }
}

/// Switch Errors. These errors are local to a single switch, and carry no device id. The network
/// wraps them into [`NetworkError`] when an operation on a specific switch fails.
#[derive(Error, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchError {
    /// The port does not exist on this switch.
    #[error("Port {0} does not exist on this switch")]
    PortNotFound(PortId),
    /// The VLAN does not exist on this switch.
    #[error("VLAN {0} does not exist on this switch")]
    VlanNotFound(VlanId),
    /// A VLAN with the same id already exists on this switch.
    #[error("VLAN {0} already exists on this switch")]
    DuplicateVlan(VlanId),
    /// VLAN 1 is the default VLAN and cannot be deleted.
    #[error("The default VLAN (id 1) cannot be deleted")]
    ProtectedVlan,
    /// VLAN ids must be strictly positive.
    #[error("Invalid VLAN id: {0}")]
    InvalidVlanId(VlanId),
}

/// Network Errors
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Switch error which cannot be handled
    #[error("Switch error on device {0:?}: {1}")]
    SwitchError(DeviceId, #[source] SwitchError),
    /// Device is not present in the topology
    #[error("Network device was not found in topology: {0:?}")]
    DeviceNotFound(DeviceId),
    /// Link is not present in the topology
    #[error("Link was not found in topology: {0:?}")]
    LinkNotFound(LinkId),
    /// The operation requires a switch, but the device is a router or a client.
    #[error("Network device is not a switch: {0:?}")]
    DeviceIsNotSwitch(DeviceId),
    /// Both endpoints of a link must be distinct devices.
    #[error("Cannot create a link from {0:?} to itself")]
    LinkIsSelfLoop(DeviceId),
    /// Json error
    #[error("{0}")]
    JsonError(Box<serde_json::Error>),
}

impl From<serde_json::Error> for NetworkError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(Box::new(value))
    }
}

impl PartialEq for NetworkError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SwitchError(l0, l1), Self::SwitchError(r0, r1)) => l0 == r0 && l1 == r1,
            (Self::DeviceNotFound(l0), Self::DeviceNotFound(r0)) => l0 == r0,
            (Self::LinkNotFound(l0), Self::LinkNotFound(r0)) => l0 == r0,
            (Self::DeviceIsNotSwitch(l0), Self::DeviceIsNotSwitch(r0)) => l0 == r0,
            (Self::LinkIsSelfLoop(l0), Self::LinkIsSelfLoop(r0)) => l0 == r0,
            (Self::JsonError(l0), Self::JsonError(r0)) => l0.to_string() == r0.to_string(),
            _ => false,
        }
    }
}
