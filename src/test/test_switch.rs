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

//! Test the port and VLAN operations of the switch subsystem.

use maplit::btreeset;
use pretty_assertions::assert_eq;

use crate::network::Network;
use crate::prelude::*;

/// A network with a single switch, returning the switch id.
fn get_switch_net() -> (Network, DeviceId) {
    let mut net = Network::from_seed(42);
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    (net, s1)
}

/// Check that every port of the switch belongs to exactly one VLAN, and that the port table and
/// the VLAN member sets agree.
fn assert_one_vlan_per_port(state: &SwitchState) {
    for port in state.ports() {
        let memberships: Vec<VlanId> = state
            .vlans()
            .filter(|v| v.ports().contains(&port.id()))
            .map(|v| v.id())
            .collect();
        assert_eq!(memberships, vec![port.vlan()]);
    }
}

#[test]
fn toggle_port() {
    let (mut net, s1) = get_switch_net();
    assert_eq!(net.toggle_port(s1, 1), Ok(PortStatus::Active));
    assert_eq!(net.toggle_port(s1, 1), Ok(PortStatus::Inactive));
    assert_eq!(net.get_switch(s1).unwrap().num_active_ports(), 0);

    net.toggle_port(s1, 2).unwrap();
    net.toggle_port(s1, 3).unwrap();
    assert_eq!(net.get_switch(s1).unwrap().num_active_ports(), 2);
}

#[test]
fn toggle_port_never_leaves_the_error_state() {
    let (mut net, s1) = get_switch_net();
    net.switches.get_mut(&s1).unwrap().ports[0].status = PortStatus::Error;
    assert_eq!(net.toggle_port(s1, 1), Ok(PortStatus::Error));
    assert_eq!(
        net.get_switch(s1).unwrap().get_port(1).unwrap().status(),
        PortStatus::Error
    );
}

#[test]
fn port_errors() {
    let (mut net, s1) = get_switch_net();
    let r1 = net.add_device(DeviceKind::Router, "Router 1");
    let unknown = DeviceId::from(100);

    assert_eq!(
        net.toggle_port(unknown, 1),
        Err(NetworkError::DeviceNotFound(unknown))
    );
    assert_eq!(
        net.toggle_port(r1, 1),
        Err(NetworkError::DeviceIsNotSwitch(r1))
    );
    assert_eq!(
        net.toggle_port(s1, 0),
        Err(NetworkError::SwitchError(s1, SwitchError::PortNotFound(0)))
    );
    assert_eq!(
        net.toggle_port(s1, 5),
        Err(NetworkError::SwitchError(s1, SwitchError::PortNotFound(5)))
    );
    assert_eq!(
        net.set_port_speed(r1, 1, PortSpeed::Gbps10),
        Err(NetworkError::DeviceIsNotSwitch(r1))
    );
}

#[test]
fn set_port_speed() {
    let (mut net, s1) = get_switch_net();
    net.set_port_speed(s1, 1, PortSpeed::Mbps10).unwrap();
    net.set_port_speed(s1, 2, PortSpeed::Gbps10).unwrap();
    let state = net.get_switch(s1).unwrap();
    assert_eq!(state.get_port(1).unwrap().speed(), PortSpeed::Mbps10);
    assert_eq!(state.get_port(2).unwrap().speed(), PortSpeed::Gbps10);
    assert_eq!(state.get_port(3).unwrap().speed(), PortSpeed::Gbps1);
}

#[test]
fn create_vlan() {
    let (mut net, s1) = get_switch_net();
    net.create_vlan(s1, 10, "Management").unwrap();

    let state = net.get_switch(s1).unwrap();
    let vlan = state.get_vlan(10).unwrap();
    assert_eq!(vlan.name(), "Management");
    assert!(vlan.ports().is_empty());
    assert_one_vlan_per_port(state);
}

#[test]
fn create_vlan_errors() {
    let (mut net, s1) = get_switch_net();
    net.create_vlan(s1, 10, "Management").unwrap();
    assert_eq!(
        net.create_vlan(s1, 10, "Again"),
        Err(NetworkError::SwitchError(s1, SwitchError::DuplicateVlan(10)))
    );
    assert_eq!(
        net.create_vlan(s1, 1, "Default"),
        Err(NetworkError::SwitchError(s1, SwitchError::DuplicateVlan(1)))
    );
    assert_eq!(
        net.create_vlan(s1, 0, "Zero"),
        Err(NetworkError::SwitchError(s1, SwitchError::InvalidVlanId(0)))
    );
}

#[test]
fn assign_port_to_vlan() {
    let (mut net, s1) = get_switch_net();
    net.create_vlan(s1, 10, "Management").unwrap();
    net.assign_port_to_vlan(s1, 2, 10).unwrap();
    net.assign_port_to_vlan(s1, 3, 10).unwrap();

    let state = net.get_switch(s1).unwrap();
    assert_eq!(state.get_vlan(1).unwrap().ports(), &btreeset! {1, 4});
    assert_eq!(state.get_vlan(10).unwrap().ports(), &btreeset! {2, 3});
    assert_eq!(state.get_port(2).unwrap().vlan(), 10);
    assert_one_vlan_per_port(state);

    // moving a port back is also possible.
    net.assign_port_to_vlan(s1, 2, 1).unwrap();
    let state = net.get_switch(s1).unwrap();
    assert_eq!(state.get_vlan(1).unwrap().ports(), &btreeset! {1, 2, 4});
    assert_one_vlan_per_port(state);
}

#[test]
fn assign_port_to_vlan_errors() {
    let (mut net, s1) = get_switch_net();
    assert_eq!(
        net.assign_port_to_vlan(s1, 1, 10),
        Err(NetworkError::SwitchError(s1, SwitchError::VlanNotFound(10)))
    );
    net.create_vlan(s1, 10, "Management").unwrap();
    assert_eq!(
        net.assign_port_to_vlan(s1, 7, 10),
        Err(NetworkError::SwitchError(s1, SwitchError::PortNotFound(7)))
    );
}

#[test]
fn delete_vlan_reassigns_ports_to_default() {
    super::init_logger();
    let (mut net, s1) = get_switch_net();
    net.create_vlan(s1, 10, "Management").unwrap();
    net.create_vlan(s1, 20, "Guests").unwrap();
    net.assign_port_to_vlan(s1, 1, 10).unwrap();
    net.assign_port_to_vlan(s1, 2, 10).unwrap();
    net.assign_port_to_vlan(s1, 3, 20).unwrap();

    net.delete_vlan(s1, 10).unwrap();

    let state = net.get_switch(s1).unwrap();
    assert!(state.get_vlan(10).is_none());
    assert_eq!(state.get_vlan(1).unwrap().ports(), &btreeset! {1, 2, 4});
    assert_eq!(state.get_vlan(20).unwrap().ports(), &btreeset! {3});
    assert_eq!(state.get_port(1).unwrap().vlan(), DEFAULT_VLAN);
    assert_one_vlan_per_port(state);
}

#[test]
fn delete_vlan_errors() {
    let (mut net, s1) = get_switch_net();
    assert_eq!(
        net.delete_vlan(s1, 1),
        Err(NetworkError::SwitchError(s1, SwitchError::ProtectedVlan))
    );
    assert_eq!(
        net.delete_vlan(s1, 99),
        Err(NetworkError::SwitchError(s1, SwitchError::VlanNotFound(99)))
    );
    // VLAN 1 still exists, and deleting it keeps failing after other deletions.
    net.create_vlan(s1, 10, "Management").unwrap();
    net.delete_vlan(s1, 10).unwrap();
    assert_eq!(
        net.delete_vlan(s1, 1),
        Err(NetworkError::SwitchError(s1, SwitchError::ProtectedVlan))
    );
    assert!(net.get_switch(s1).unwrap().get_vlan(1).is_some());
}

#[test]
fn vlan_invariant_after_arbitrary_sequences() {
    let (mut net, s1) = get_switch_net();
    net.create_vlan(s1, 10, "a").unwrap();
    net.create_vlan(s1, 20, "b").unwrap();
    net.create_vlan(s1, 30, "c").unwrap();
    net.assign_port_to_vlan(s1, 1, 10).unwrap();
    net.assign_port_to_vlan(s1, 2, 20).unwrap();
    net.assign_port_to_vlan(s1, 3, 30).unwrap();
    net.assign_port_to_vlan(s1, 4, 30).unwrap();
    net.delete_vlan(s1, 30).unwrap();
    net.assign_port_to_vlan(s1, 4, 20).unwrap();
    net.delete_vlan(s1, 10).unwrap();
    net.delete_vlan(s1, 20).unwrap();

    let state = net.get_switch(s1).unwrap();
    assert_eq!(state.get_vlan(1).unwrap().ports(), &btreeset! {1, 2, 3, 4});
    assert_one_vlan_per_port(state);
}
