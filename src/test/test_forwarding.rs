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

//! Test the MAC forwarding table: learning, aging, and eviction.

use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::forwarding::ForwardingTable;
use crate::network::Network;
use crate::prelude::*;

const SECOND: Duration = Duration::from_secs(1);

fn mac(last: u8) -> MacAddress {
    MacAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, last])
}

#[test]
fn learn_resets_the_age() {
    let mut table = ForwardingTable::new(Duration::from_secs(3));
    table.learn(mac(1), 1);
    table.age(2 * SECOND);
    assert_eq!(table.get(&mac(1)).unwrap().age, 2 * SECOND);

    // relearning resets the age to zero.
    table.learn(mac(1), 1);
    assert_eq!(table.get(&mac(1)).unwrap().age, Duration::ZERO);

    table.age(3 * SECOND);
    assert!(table.get(&mac(1)).is_some());
    table.age(SECOND);
    assert!(table.get(&mac(1)).is_none());
}

#[test]
fn last_seen_port_wins() {
    let mut table = ForwardingTable::default();
    table.learn(mac(1), 1);
    table.learn(mac(1), 3);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&mac(1)).unwrap().port, 3);
}

#[test]
fn entries_age_independently() {
    let mut table = ForwardingTable::new(Duration::from_secs(10));
    table.learn(mac(1), 1);
    table.age(6 * SECOND);
    table.learn(mac(2), 2);
    table.age(5 * SECOND);

    // mac(1) is now at age 11 and evicted, mac(2) at age 5 and kept.
    assert!(table.get(&mac(1)).is_none());
    assert_eq!(table.get(&mac(2)).unwrap().age, 5 * SECOND);
    assert_eq!(table.len(), 1);
}

#[test]
fn aging_is_deterministic() {
    let mut a = ForwardingTable::default();
    let mut b = ForwardingTable::default();
    for table in [&mut a, &mut b] {
        table.learn(mac(1), 1);
        table.learn(mac(2), 4);
        table.age(100 * SECOND);
        table.learn(mac(2), 2);
        table.age(250 * SECOND);
    }
    assert_eq!(a, b);
    assert!(a.get(&mac(1)).is_none());
    assert_eq!(a.get(&mac(2)).unwrap().age, 250 * SECOND);
}

/// An entry that is never relearned must disappear once `N * tick_interval > max_age`.
#[test]
fn unrefreshed_entries_are_evicted_by_the_tick() {
    super::init_logger();
    let mut net = Network::from_seed(42);
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    net.start();

    // inject an address outside of the synthetic pool, so no tick ever refreshes it.
    net.learn_mac(s1, mac(7), 2).unwrap();

    for _ in 0..300 {
        net.tick();
    }
    // at age 300 s the entry is still within the maximum age of 300 s.
    let entry = net.get_switch(s1).unwrap().table().get(&mac(7)).cloned();
    assert_eq!(entry.map(|e| e.age), Some(Duration::from_secs(300)));

    net.tick();
    assert!(net.get_switch(s1).unwrap().table().get(&mac(7)).is_none());
}

/// Aging runs after the learn step of a tick, so even an entry refreshed this tick leaves the
/// tick at age = interval, never 0.
#[test]
fn ticks_age_freshly_learned_entries() {
    let mut net = Network::from_seed(42);
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    net.start();
    for _ in 0..20 {
        net.tick();
    }

    let table = net.get_switch(s1).unwrap().table();
    assert!(!table.is_empty());
    for entry in table.iter() {
        assert!(entry.age >= SECOND);
        assert_eq!(entry.age.subsec_nanos(), 0);
    }
}

#[test]
fn inactive_switches_do_not_learn_or_age() {
    let mut net = Network::from_seed(42);
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    net.learn_mac(s1, mac(1), 1).unwrap();

    // the simulation is stopped: the switch is not active, so ticks leave its table alone.
    for _ in 0..10 {
        net.tick();
    }
    let table = net.get_switch(s1).unwrap().table();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&mac(1)).unwrap().age, Duration::ZERO);
}

#[test]
fn learn_mac_errors() {
    let mut net = Network::from_seed(42);
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    let c1 = net.add_device(DeviceKind::Client, "Client 1");
    assert_eq!(
        net.learn_mac(c1, mac(1), 1),
        Err(NetworkError::DeviceIsNotSwitch(c1))
    );
    assert_eq!(
        net.learn_mac(s1, mac(1), 9),
        Err(NetworkError::SwitchError(s1, SwitchError::PortNotFound(9)))
    );
}

#[test]
fn forwarding_tables_survive_stop() {
    let mut net = Network::from_seed(42);
    let s1 = net.add_device(DeviceKind::Switch, "Switch 1");
    net.start();
    net.learn_mac(s1, mac(1), 1).unwrap();
    net.tick();
    net.stop();

    // stop clears the metrics but keeps the learned addresses.
    assert!(net.metrics_history().is_empty());
    assert!(net.get_switch(s1).unwrap().table().get(&mac(1)).is_some());
}

#[test]
fn mac_address_display_and_parse() {
    let addr = MacAddress::new([0x02, 0x1a, 0x04, 0x00, 0x00, 0x2a]);
    assert_eq!(addr.to_string(), "02:1a:04:00:00:2a");
    assert_eq!("02:1a:04:00:00:2a".parse(), Ok(addr));
    assert_eq!("02:1A:04:00:00:2A".parse(), Ok(addr));

    assert_eq!(
        "02:1a:04:00:00".parse::<MacAddress>(),
        Err(ParseMacError::InvalidGroupCount(5))
    );
    assert_eq!(
        "02:1a:04:00:00:zz".parse::<MacAddress>(),
        Err(ParseMacError::InvalidOctet("zz".to_string()))
    );

    // serialization uses the canonical string form.
    assert_eq!(
        serde_json::to_string(&addr).unwrap(),
        "\"02:1a:04:00:00:2a\""
    );
    assert_eq!(
        serde_json::from_str::<MacAddress>("\"02:1a:04:00:00:2a\"").unwrap(),
        addr
    );
}
