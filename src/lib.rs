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

#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # LanSim
//!
//! This is a library for simulating small layer-2 network topologies (routers, switches, and
//! clients), producing live synthetic traffic metrics while the topology is being edited.
//!
//! ## Main Concepts
//!
//! The [`network::Network`] is the main datastructure to operate on. It owns all devices, the
//! links connecting them (stored on a graph, see
//! [Petgraph](https://docs.rs/petgraph/latest/petgraph/index.html)), and the per-switch state:
//! ports, VLANs, and the MAC forwarding table with aging (see [`switch::SwitchState`] and
//! [`forwarding::ForwardingTable`]).
//!
//! The simulation is advanced by calling [`network::Network::tick`]. Each tick produces one
//! [`metrics::TrafficSample`], refreshes the link utilizations, and lets every active switch
//! learn and age MAC table entries. All randomness flows through a single injectable generator,
//! so a network created with [`network::Network::from_seed`] behaves fully deterministic.
//!
//! To run the simulation on a wall clock instead of driving it manually, wrap the network in a
//! [`session::SimulationSession`]. The session owns a background ticker thread that fires while
//! the simulation is in [`types::Phase::Running`], and guarantees that no tick is delivered
//! after `pause()` or `stop()` returned.
//!
//! Presentation layers consume [`snapshot::NetworkSnapshot`] (a deep, point-in-time copy) or
//! subscribe to the [`event::NetworkEvent`] feed instead of touching the mutable state.
//!
//! ## Example usage
//!
//! ```
//! use lansim::prelude::*;
//!
//! fn main() -> Result<(), NetworkError> {
//!     let mut net = Network::from_seed(42);
//!
//!     // build a small topology: one router, one switch, one client.
//!     let r1 = net.add_device(DeviceKind::Router, "Router 1");
//!     let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
//!     let c1 = net.add_device(DeviceKind::Client, "Client 1");
//!     net.add_link(r1, s1)?;
//!     net.add_link(r1, c1)?;
//!
//!     // every switch starts with four ports on VLAN 1 ("Default").
//!     net.create_vlan(s1, 10, "Management")?;
//!     net.assign_port_to_vlan(s1, 2, 10)?;
//!
//!     // drive the simulation manually.
//!     net.start();
//!     for _ in 0..5 {
//!         net.tick();
//!     }
//!     assert_eq!(net.metrics_history().len(), 5);
//!
//!     // stopping clears the metrics history and deactivates all devices.
//!     net.stop();
//!     assert!(net.metrics_history().is_empty());
//!
//!     Ok(())
//! }
//! ```

mod clock;
pub mod device;
pub mod event;
#[cfg(not(tarpaulin_include))]
pub mod formatter;
pub mod forwarding;
pub mod metrics;
pub mod network;
pub mod prelude;
pub mod session;
pub mod snapshot;
pub mod switch;
pub mod types;

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
mod test;
