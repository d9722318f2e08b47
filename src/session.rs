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

//! Module containing the simulation session: the thread-safe owner of one network and its
//! clock.
//!
//! All state of one simulation lives in a single [`SimulationSession`] (there is no ambient
//! global state), so independent sessions, and in particular independent tests, never
//! contaminate each other. The session serializes every mutation on one mutex: the clock tick
//! and all intent-driven commands take the same lock, and snapshots are copied under it.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::*;

use crate::{
    clock::SimulationClock,
    device::DeviceKind,
    event::NetworkEvent,
    metrics::TrafficSample,
    network::Network,
    snapshot::NetworkSnapshot,
    switch::{PortSpeed, PortStatus},
    types::{DeviceId, LinkId, MacAddress, NetworkError, Phase, PortId, VlanId},
};

/// Lock a shared network, ignoring poisoning (the network state is kept consistent by each
/// operation individually, so observing the state of a panicked writer is safe).
pub(crate) fn lock(net: &Mutex<Network>) -> MutexGuard<'_, Network> {
    net.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Simulation session
///
/// A session owns a [`Network`] behind a mutex, together with the clock thread that drives it
/// while the simulation is running. It exposes the same command and query surface as the
/// network itself, plus the lifecycle of the clock:
///
/// - [`SimulationSession::start`] spawns the ticker thread (or resumes it after a pause),
/// - [`SimulationSession::pause`] and [`SimulationSession::stop`] cancel it *synchronously*:
///   when the call returns, no further tick will fire.
///
/// Dropping the session cancels the clock as well.
///
/// ```rust
/// use lansim::prelude::*;
/// use std::time::Duration;
///
/// fn main() -> Result<(), NetworkError> {
///     let mut session = SimulationSession::from_seed(42);
///     session.set_tick_interval(Duration::from_millis(10));
///
///     let s1 = session.add_device(DeviceKind::Switch, "Switch 1");
///     let c1 = session.add_device(DeviceKind::Client, "Client 1");
///     session.add_link(s1, c1)?;
///
///     session.start();
///     std::thread::sleep(Duration::from_millis(100));
///     session.stop();
///
///     // stop() cancelled the clock and cleared the metrics.
///     assert_eq!(session.phase(), Phase::Stopped);
///     assert!(session.metrics_history().is_empty());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SimulationSession {
    net: Arc<Mutex<Network>>,
    clock: Option<SimulationClock>,
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationSession {
    /// Create a session around an empty network with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::from_network(Network::new())
    }

    /// Create a session around an empty network with a fully reproducible random source.
    pub fn from_seed(seed: u64) -> Self {
        Self::from_network(Network::from_seed(seed))
    }

    /// Create a session owning the given network. The clock is only spawned on
    /// [`SimulationSession::start`], even if the network is already in the running phase.
    pub fn from_network(net: Network) -> Self {
        Self {
            net: Arc::new(Mutex::new(net)),
            clock: None,
        }
    }

    // ------------------------
    // Simulation control
    // ------------------------

    /// Start or resume the simulation: all devices and links become active, and the clock
    /// begins ticking every tick interval. No-op if the simulation is already running.
    pub fn start(&mut self) {
        let interval = {
            let mut net = lock(&self.net);
            net.start();
            net.tick_interval()
        };
        if self.clock.is_none() {
            self.clock = Some(SimulationClock::spawn(self.net.clone(), interval));
        }
    }

    /// Pause the simulation. The clock is cancelled synchronously; devices stay active, and
    /// both the metrics history and the forwarding tables are preserved. Fail-soft no-op if the
    /// simulation is not running.
    pub fn pause(&mut self) {
        lock(&self.net).pause();
        self.cancel_clock();
    }

    /// Stop the simulation. The clock is cancelled synchronously, the metrics history is
    /// cleared, and all devices and links are deactivated. Forwarding tables persist.
    pub fn stop(&mut self) {
        lock(&self.net).stop();
        self.cancel_clock();
    }

    /// Set the time between two simulation ticks. If the clock is currently running, it is
    /// restarted with the new interval.
    pub fn set_tick_interval(&mut self, interval: Duration) {
        lock(&self.net).set_tick_interval(interval);
        if self.clock.is_some() {
            self.cancel_clock();
            self.clock = Some(SimulationClock::spawn(self.net.clone(), interval));
        }
    }

    // ------------------------
    // Commands (forwarded to the network under the session lock)
    // ------------------------

    /// Add a new device to the topology. See [`Network::add_device`].
    pub fn add_device(&self, kind: DeviceKind, label: impl Into<String>) -> DeviceId {
        lock(&self.net).add_device(kind, label)
    }

    /// Create a link between two existing devices. See [`Network::add_link`].
    pub fn add_link(&self, source: DeviceId, target: DeviceId) -> Result<LinkId, NetworkError> {
        lock(&self.net).add_link(source, target)
    }

    /// Remove a link from the topology. See [`Network::remove_link`].
    pub fn remove_link(&self, link: LinkId) -> Result<(), NetworkError> {
        lock(&self.net).remove_link(link)
    }

    /// Remove a device and all its links. See [`Network::remove_device`].
    pub fn remove_device(&self, device: DeviceId) -> Result<(), NetworkError> {
        lock(&self.net).remove_device(device)
    }

    /// Flip a port between `Active` and `Inactive`. See [`Network::toggle_port`].
    pub fn toggle_port(&self, switch: DeviceId, port: PortId) -> Result<PortStatus, NetworkError> {
        lock(&self.net).toggle_port(switch, port)
    }

    /// Set the speed of a port. See [`Network::set_port_speed`].
    pub fn set_port_speed(
        &self,
        switch: DeviceId,
        port: PortId,
        speed: PortSpeed,
    ) -> Result<(), NetworkError> {
        lock(&self.net).set_port_speed(switch, port, speed)
    }

    /// Create a new VLAN on a switch. See [`Network::create_vlan`].
    pub fn create_vlan(
        &self,
        switch: DeviceId,
        vlan_id: VlanId,
        name: impl Into<String>,
    ) -> Result<(), NetworkError> {
        lock(&self.net).create_vlan(switch, vlan_id, name)
    }

    /// Delete a VLAN from a switch. See [`Network::delete_vlan`].
    pub fn delete_vlan(&self, switch: DeviceId, vlan_id: VlanId) -> Result<(), NetworkError> {
        lock(&self.net).delete_vlan(switch, vlan_id)
    }

    /// Move a port into the given VLAN. See [`Network::assign_port_to_vlan`].
    pub fn assign_port_to_vlan(
        &self,
        switch: DeviceId,
        port: PortId,
        vlan_id: VlanId,
    ) -> Result<(), NetworkError> {
        lock(&self.net).assign_port_to_vlan(switch, port, vlan_id)
    }

    /// Learn a MAC address on a port of a switch. See [`Network::learn_mac`].
    pub fn learn_mac(
        &self,
        switch: DeviceId,
        mac: MacAddress,
        port: PortId,
    ) -> Result<(), NetworkError> {
        lock(&self.net).learn_mac(switch, mac, port)
    }

    // ------------------------
    // Queries
    // ------------------------

    /// Get the current phase of the simulation.
    pub fn phase(&self) -> Phase {
        lock(&self.net).phase()
    }

    /// Extract a deep, point-in-time copy of the entire state. The copy is made under the
    /// session lock, so it is always consistent.
    pub fn get_snapshot(&self) -> NetworkSnapshot {
        lock(&self.net).get_snapshot()
    }

    /// Get a copy of the bounded metrics history, oldest sample first.
    pub fn metrics_history(&self) -> Vec<TrafficSample> {
        lock(&self.net).metrics_history().iter().cloned().collect()
    }

    /// Subscribe to all future change notifications. See [`Network::subscribe`].
    pub fn subscribe(&self) -> Receiver<NetworkEvent> {
        lock(&self.net).subscribe()
    }

    /// Run `f` with exclusive access to the underlying network. This serializes with the clock
    /// tick like any other command.
    pub fn with_network<T>(&self, f: impl FnOnce(&mut Network) -> T) -> T {
        f(&mut lock(&self.net))
    }

    fn cancel_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            trace!("Cancelling the simulation clock");
            clock.cancel();
        }
    }
}

impl Drop for SimulationSession {
    fn drop(&mut self) {
        self.cancel_clock();
    }
}
