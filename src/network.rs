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

//! # Top-level Network module
//!
//! This module represents the network topology, owns all device and switch state, and advances
//! the simulation one tick at a time.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use itertools::Itertools;
use log::*;
use petgraph::visit::EdgeRef;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    device::{Device, DeviceKind},
    event::NetworkEvent,
    metrics::{MetricsHistory, TrafficSample},
    snapshot::NetworkSnapshot,
    switch::{PortSpeed, PortStatus, SwitchState},
    types::{
        DeviceId, LinkId, MacAddress, NetworkError, Phase, PortId, TopologyGraph, VlanId,
    },
};

/// The default time between two simulation ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// A link connecting two devices. Parallel links between the same pair of devices are allowed
/// (each with its own id); self-loops are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// ID of the link
    link_id: LinkId,
    /// The device the link was drawn from.
    source: DeviceId,
    /// The device the link was drawn to.
    target: DeviceId,
    /// Whether the link is currently carrying (synthetic) traffic. Follows the simulation phase.
    pub(crate) animated: bool,
    /// Synthetic utilization of the link in percent, refreshed on every tick.
    pub(crate) utilization: f64,
}

impl Link {
    /// Get the ID of the link.
    pub fn link_id(&self) -> LinkId {
        self.link_id
    }

    /// Get the device the link was drawn from.
    pub fn source(&self) -> DeviceId {
        self.source
    }

    /// Get the device the link was drawn to.
    pub fn target(&self) -> DeviceId {
        self.target
    }

    /// Returns `true` while the simulation is running.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Get the current synthetic utilization in percent.
    pub fn utilization(&self) -> f64 {
        self.utilization
    }
}

/// # Network struct
/// The struct contains the entire topology (devices and links), the state of every switch, and
/// the simulation state (phase, tick interval, and metrics history). It is the single writer of
/// all of that state: every mutation, whether intent-driven (adding devices, toggling ports) or
/// tick-driven, goes through `&mut self`.
///
/// ```rust
/// use lansim::prelude::*;
///
/// fn main() -> Result<(), NetworkError> {
///     // create an empty network.
///     let mut net = Network::default();
///
///     // add two devices and connect them.
///     let r1 = net.add_device(DeviceKind::Router, "r1");
///     let s1 = net.add_device(DeviceKind::Switch, "s1");
///     net.add_link(r1, s1)?;
///
///     Ok(())
/// }
/// ```
///
/// All synthetic values (traffic samples, MAC learning, link utilization) are drawn from a
/// single random source injected at construction. Use [`Network::from_seed`] to make every
/// simulated value reproducible, and [`Network::new`] for a source seeded from entropy.
#[derive(Debug, Serialize, Deserialize)]
pub struct Network {
    pub(crate) graph: TopologyGraph,
    pub(crate) devices: HashMap<DeviceId, Device>,
    pub(crate) switches: HashMap<DeviceId, SwitchState>,
    pub(crate) links: HashMap<LinkId, Link>,
    pub(crate) phase: Phase,
    pub(crate) tick_interval: Duration,
    pub(crate) history: MetricsHistory,
    #[serde(skip, default = "default_rng")]
    rng: StdRng,
    #[serde(skip)]
    subscribers: Vec<Sender<NetworkEvent>>,
}

fn default_rng() -> StdRng {
    StdRng::from_entropy()
}

impl Clone for Network {
    /// Cloning the network does not clone the subscriber list.
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            devices: self.devices.clone(),
            switches: self.switches.clone(),
            links: self.links.clone(),
            phase: self.phase,
            tick_interval: self.tick_interval,
            history: self.history.clone(),
            rng: self.rng.clone(),
            subscribers: Vec::new(),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Network {
    /// Two networks are equal if they hold the same topology, switch state, phase, and metrics.
    /// The random source and the subscriber list are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.devices == other.devices
            && self.switches == other.switches
            && self.links == other.links
            && self.phase == other.phase
            && self.tick_interval == other.tick_interval
            && self.history == other.history
    }
}

impl Network {
    /// Generate an empty network with a random source seeded from entropy.
    pub fn new() -> Self {
        Self::with_rng(default_rng())
    }

    /// Generate an empty network whose synthetic values are fully reproducible.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Generate an empty network using the given random source.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            graph: TopologyGraph::default(),
            devices: HashMap::new(),
            switches: HashMap::new(),
            links: HashMap::new(),
            phase: Phase::Stopped,
            tick_interval: DEFAULT_TICK_INTERVAL,
            history: MetricsHistory::default(),
            rng,
            subscribers: Vec::new(),
        }
    }

    // ------------------------
    // Topology editing
    // ------------------------

    /// Add a new device to the topology and return its id. A switch is created together with its
    /// fully initialized [`SwitchState`]: four inactive 1G ports, all members of VLAN 1
    /// ("Default"). The new device starts active unless the simulation is stopped, so it matches
    /// the activation state of the devices around it.
    pub fn add_device(&mut self, kind: DeviceKind, label: impl Into<String>) -> DeviceId {
        let device_id = self.graph.add_node(());
        let active = self.phase != Phase::Stopped;
        let device = Device::new(label.into(), device_id, kind, active);
        debug!("Add {} {:?} ({})", kind, device_id, device.label());
        self.devices.insert(device_id, device);
        if kind == DeviceKind::Switch {
            self.switches.insert(device_id, SwitchState::default());
        }
        self.notify(NetworkEvent::DeviceAdded(device_id));
        device_id
    }

    /// Create a link between two existing devices and return its id. When an endpoint is a
    /// switch, the peer device is recorded on the first free port of that switch. Parallel links
    /// between the same pair are allowed; self-loops are rejected.
    pub fn add_link(&mut self, source: DeviceId, target: DeviceId) -> Result<LinkId, NetworkError> {
        for id in [source, target] {
            if !self.devices.contains_key(&id) {
                return Err(NetworkError::DeviceNotFound(id));
            }
        }
        if source == target {
            return Err(NetworkError::LinkIsSelfLoop(source));
        }
        let link_id = self.graph.add_edge(source, target, ());
        self.links.insert(
            link_id,
            Link {
                link_id,
                source,
                target,
                animated: self.phase != Phase::Stopped,
                utilization: 0.0,
            },
        );
        if let Some(switch) = self.switches.get_mut(&source) {
            switch.attach_device(target);
        }
        if let Some(switch) = self.switches.get_mut(&target) {
            switch.attach_device(source);
        }
        debug!("Add link {link_id:?}: {source:?} -- {target:?}");
        self.notify(NetworkEvent::LinkAdded(link_id));
        Ok(link_id)
    }

    /// Remove a link from the topology, releasing the switch ports it occupied.
    pub fn remove_link(&mut self, link: LinkId) -> Result<(), NetworkError> {
        let Link { source, target, .. } = self
            .links
            .remove(&link)
            .ok_or(NetworkError::LinkNotFound(link))?;
        self.graph.remove_edge(link);
        if let Some(switch) = self.switches.get_mut(&source) {
            switch.detach_device(target);
        }
        if let Some(switch) = self.switches.get_mut(&target) {
            switch.detach_device(source);
        }
        debug!("Remove link {link:?}: {source:?} -- {target:?}");
        self.notify(NetworkEvent::LinkRemoved(link));
        Ok(())
    }

    /// Remove a device from the topology. All links touching the device are removed as well, and
    /// the switch state of a removed switch is discarded.
    pub fn remove_device(&mut self, device: DeviceId) -> Result<(), NetworkError> {
        if !self.devices.contains_key(&device) {
            return Err(NetworkError::DeviceNotFound(device));
        }
        let incident: Vec<LinkId> = self.graph.edges(device).map(|e| e.id()).collect();
        for link in incident {
            self.remove_link(link)?;
        }
        self.graph.remove_node(device);
        self.switches.remove(&device);
        self.devices.remove(&device);
        debug!("Remove device {device:?}");
        self.notify(NetworkEvent::DeviceRemoved(device));
        Ok(())
    }

    // ------------------------
    // Switch configuration
    // ------------------------

    /// Flip a port of a switch between `Active` and `Inactive`, returning the new status. A port
    /// in the reserved `Error` state is left untouched.
    pub fn toggle_port(
        &mut self,
        switch: DeviceId,
        port: PortId,
    ) -> Result<PortStatus, NetworkError> {
        let state = self.get_switch_mut(switch)?;
        let status = state
            .toggle_port(port)
            .map_err(|e| NetworkError::SwitchError(switch, e))?;
        debug!("Port {port} on {switch:?} is now {status}");
        Ok(status)
    }

    /// Set the speed of a port of a switch.
    pub fn set_port_speed(
        &mut self,
        switch: DeviceId,
        port: PortId,
        speed: PortSpeed,
    ) -> Result<(), NetworkError> {
        self.get_switch_mut(switch)?
            .set_port_speed(port, speed)
            .map_err(|e| NetworkError::SwitchError(switch, e))
    }

    /// Create a new VLAN (without member ports) on a switch.
    pub fn create_vlan(
        &mut self,
        switch: DeviceId,
        vlan_id: VlanId,
        name: impl Into<String>,
    ) -> Result<(), NetworkError> {
        self.get_switch_mut(switch)?
            .create_vlan(vlan_id, name)
            .map_err(|e| NetworkError::SwitchError(switch, e))
    }

    /// Delete a VLAN from a switch. All member ports are reassigned to VLAN 1, so that every
    /// port keeps belonging to exactly one VLAN. VLAN 1 itself cannot be deleted.
    pub fn delete_vlan(&mut self, switch: DeviceId, vlan_id: VlanId) -> Result<(), NetworkError> {
        self.get_switch_mut(switch)?
            .delete_vlan(vlan_id)
            .map_err(|e| NetworkError::SwitchError(switch, e))
    }

    /// Move a port of a switch into the given VLAN, removing it from its current one.
    pub fn assign_port_to_vlan(
        &mut self,
        switch: DeviceId,
        port: PortId,
        vlan_id: VlanId,
    ) -> Result<(), NetworkError> {
        self.get_switch_mut(switch)?
            .assign_port_to_vlan(port, vlan_id)
            .map_err(|e| NetworkError::SwitchError(switch, e))
    }

    /// Learn a MAC address on a port of a switch, resetting the age of the entry. The simulation
    /// clock calls this for active switches on every tick; it can also be called directly to
    /// inject a deterministic learn event.
    pub fn learn_mac(
        &mut self,
        switch: DeviceId,
        mac: MacAddress,
        port: PortId,
    ) -> Result<(), NetworkError> {
        self.get_switch_mut(switch)?
            .learn(mac, port)
            .map_err(|e| NetworkError::SwitchError(switch, e))
    }

    // ------------------------
    // Simulation control
    // ------------------------

    /// Start or resume the simulation. All devices and links become active. Returns `false` (and
    /// does nothing) if the simulation is already running.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Running => false,
            Phase::Stopped | Phase::Paused => {
                info!("Simulation transitions {} -> Running", self.phase);
                self.phase = Phase::Running;
                self.set_all_active(true);
                self.notify(NetworkEvent::PhaseChanged(Phase::Running));
                true
            }
        }
    }

    /// Pause the simulation. Devices remain active, and both the metrics history and all
    /// forwarding tables are preserved. Pausing a stopped (or already paused) simulation is a
    /// fail-soft no-op returning `false`.
    pub fn pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => {
                info!("Simulation transitions Running -> Paused");
                self.phase = Phase::Paused;
                self.notify(NetworkEvent::PhaseChanged(Phase::Paused));
                true
            }
            Phase::Stopped | Phase::Paused => false,
        }
    }

    /// Stop the simulation. The metrics history is cleared and all devices and links are
    /// deactivated. Forwarding tables are kept until their entries age out or are overwritten.
    /// Stopping a stopped simulation is a no-op returning `false`.
    pub fn stop(&mut self) -> bool {
        match self.phase {
            Phase::Stopped => false,
            Phase::Running | Phase::Paused => {
                info!("Simulation transitions {} -> Stopped", self.phase);
                self.phase = Phase::Stopped;
                self.history.clear();
                self.set_all_active(false);
                self.notify(NetworkEvent::PhaseChanged(Phase::Stopped));
                true
            }
        }
    }

    /// Advance the simulation by one tick:
    ///
    /// 1. Produce one [`TrafficSample`] and append it to the bounded metrics history.
    /// 2. For every active switch, learn up to three synthetic MAC addresses (preferring active
    ///    ports), age the forwarding table by the tick interval, and refresh the aggregate
    ///    statistics.
    /// 3. Refresh the utilization of every link.
    ///
    /// The structure of a tick is always the same; only the values are randomized. The produced
    /// sample is returned and also emitted as [`NetworkEvent::TickCompleted`].
    pub fn tick(&mut self) -> TrafficSample {
        let sample = TrafficSample::sample(&mut self.rng);
        self.history.push(sample.clone());

        let interval = self.tick_interval;
        // iterate in id order: the map iteration order is arbitrary, and the random draws must
        // be attributed to the same switch in every identically-seeded network.
        for (id, switch) in self.switches.iter_mut().sorted_by_key(|(id, _)| **id) {
            if !self.devices.get(id).map(Device::is_active).unwrap_or(false) {
                continue;
            }
            let ports = eligible_ports(switch);
            for _ in 0..self.rng.gen_range(0..=3) {
                let mac = synthetic_mac(&mut self.rng);
                if let Some(port) = ports.choose(&mut self.rng) {
                    switch.table.learn(mac, *port);
                }
            }
            switch.table.age(interval);
            switch.stats.throughput_mbps = self.rng.gen_range(0.0..100.0);
            switch.stats.utilization = self.rng.gen_range(10.0..90.0);
            if self.rng.gen_ratio(1, 20) {
                switch.stats.errors += 1;
            }
        }

        let animated = self.phase == Phase::Running;
        for link in self.links.values_mut().sorted_by_key(|l| l.link_id) {
            link.utilization = self.rng.gen_range(0.0..100.0);
            link.animated = animated;
        }

        trace!("Tick completed: {sample:?}");
        self.notify(NetworkEvent::TickCompleted(sample.clone()));
        sample
    }

    /// Get the current phase of the simulation.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the time between two simulation ticks.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Set the time between two simulation ticks. Forwarding tables age by this amount per tick.
    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }

    // ------------------------
    // Queries
    // ------------------------

    /// Get a reference to a device.
    pub fn get_device(&self, device: DeviceId) -> Result<&Device, NetworkError> {
        self.devices
            .get(&device)
            .ok_or(NetworkError::DeviceNotFound(device))
    }

    /// Get the label of a device, if it exists.
    pub fn get_device_label(&self, device: DeviceId) -> Option<&str> {
        self.devices.get(&device).map(Device::label)
    }

    /// Get a reference to the state of a switch.
    pub fn get_switch(&self, switch: DeviceId) -> Result<&SwitchState, NetworkError> {
        if !self.devices.contains_key(&switch) {
            return Err(NetworkError::DeviceNotFound(switch));
        }
        self.switches
            .get(&switch)
            .ok_or(NetworkError::DeviceIsNotSwitch(switch))
    }

    /// Get a reference to a link.
    pub fn get_link(&self, link: LinkId) -> Result<&Link, NetworkError> {
        self.links.get(&link).ok_or(NetworkError::LinkNotFound(link))
    }

    /// Iterate over all devices, in no particular order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Iterate over all links, in no particular order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Get the number of devices in the topology.
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Get the number of links in the topology.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Get the bounded history of traffic samples, oldest first.
    pub fn metrics_history(&self) -> &MetricsHistory {
        &self.history
    }

    /// Extract a deep, point-in-time, read-only copy of the entire state for presentation. The
    /// snapshot never aliases the mutable state of the network.
    pub fn get_snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot::from_net(self)
    }

    // ------------------------
    // Events and persistence
    // ------------------------

    /// Subscribe to all future change notifications of this network. The receiver end of the
    /// returned channel yields one [`NetworkEvent`] per state change. Dropped receivers are
    /// pruned lazily on the next notification.
    pub fn subscribe(&mut self) -> Receiver<NetworkEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Serialize the network to JSON. The random source and the subscriber list are not part of
    /// the serialized state.
    pub fn as_json(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a network from its JSON representation. The restored network has a fresh,
    /// entropy-seeded random source and no subscribers.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    // ------------------------
    // Internal helpers
    // ------------------------

    fn get_switch_mut(&mut self, switch: DeviceId) -> Result<&mut SwitchState, NetworkError> {
        if !self.devices.contains_key(&switch) {
            return Err(NetworkError::DeviceNotFound(switch));
        }
        self.switches
            .get_mut(&switch)
            .ok_or(NetworkError::DeviceIsNotSwitch(switch))
    }

    /// Set the activation flag of every device and link at once. Readers (which copy under the
    /// same exclusive access) never observe a partial update.
    fn set_all_active(&mut self, active: bool) {
        for device in self.devices.values_mut() {
            device.active = active;
        }
        for link in self.links.values_mut() {
            link.animated = active;
        }
    }

    fn notify(&mut self, event: NetworkEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// The ports a synthetic learn event may pick: the active ports if any port is up, and all
/// ports otherwise.
fn eligible_ports(switch: &SwitchState) -> Vec<PortId> {
    let active: Vec<PortId> = switch
        .ports()
        .iter()
        .filter(|p| p.status() == PortStatus::Active)
        .map(|p| p.id())
        .collect();
    if active.is_empty() {
        switch.ports().iter().map(|p| p.id()).collect()
    } else {
        active
    }
}

/// Draw one address from the synthetic MAC pool: 64 addresses under the locally administered
/// prefix `02:1a:04`. The small pool makes relearning (and age resets) actually happen.
fn synthetic_mac<R: Rng>(rng: &mut R) -> MacAddress {
    MacAddress::new([0x02, 0x1a, 0x04, 0x00, 0x00, rng.gen_range(0..64)])
}
