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

//! Test saving a network to JSON and restoring it.

use pretty_assertions::assert_eq;

use crate::network::Network;
use crate::prelude::*;

/// A network with some topology, switch configuration, and simulation history.
fn get_test_net() -> Network {
    let mut net = Network::from_seed(42);
    let r1 = net.add_device(DeviceKind::Router, "Router 1");
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    let c1 = net.add_device(DeviceKind::Client, "Client 1");
    net.add_link(r1, s1).unwrap();
    net.add_link(s1, c1).unwrap();

    net.create_vlan(s1, 10, "Management").unwrap();
    net.assign_port_to_vlan(s1, 3, 10).unwrap();
    net.toggle_port(s1, 3).unwrap();
    net.set_port_speed(s1, 3, PortSpeed::Mbps100).unwrap();
    net.learn_mac(s1, MacAddress::new([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]), 3)
        .unwrap();

    net.start();
    for _ in 0..5 {
        net.tick();
    }
    net.pause();
    net
}

#[test]
fn json_round_trip() {
    super::init_logger();
    let net = get_test_net();
    let json = net.as_json().unwrap();
    let restored = Network::from_json(&json).unwrap();
    assert_eq!(net, restored);
}

#[test]
fn restored_network_preserves_all_state() {
    let net = get_test_net();
    let restored = Network::from_json(&net.as_json().unwrap()).unwrap();

    assert_eq!(restored.phase(), Phase::Paused);
    assert_eq!(restored.num_devices(), 3);
    assert_eq!(restored.num_links(), 2);
    assert_eq!(restored.metrics_history().len(), 5);
    assert_eq!(restored.tick_interval(), net.tick_interval());

    // the snapshots agree down to every port, VLAN, and forwarding entry.
    assert_eq!(net.get_snapshot(), restored.get_snapshot());
}

#[test]
fn restored_network_can_resume_the_simulation() {
    let net = get_test_net();
    let mut restored = Network::from_json(&net.as_json().unwrap()).unwrap();

    // the random source is not serialized, but a fresh one keeps the samples in range.
    restored.start();
    let sample = restored.tick();
    assert!((100..1100).contains(&sample.packets_per_second));
    assert_eq!(restored.metrics_history().len(), 6);

    restored.stop();
    assert!(restored.metrics_history().is_empty());
}

#[test]
fn from_json_rejects_garbage() {
    assert!(matches!(
        Network::from_json("not json at all"),
        Err(NetworkError::JsonError(_))
    ));
    assert!(matches!(
        Network::from_json("{\"devices\": 42}"),
        Err(NetworkError::JsonError(_))
    ));
}
