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

//! Module that introduces a formatter to display all types containing device or link ids with
//! the device labels filled in.

use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;

use crate::{
    event::NetworkEvent,
    network::Network,
    types::{DeviceId, LinkId},
};

/// Trait to format a type that contains device or link ids.
pub trait NetworkFormatter<'a, 'n> {
    /// Type that is returned, which implements `std::fmt::Display`.
    type Formatter;

    /// Return a struct that can be formatted and displayed, resolving ids to device labels.
    /// Unknown ids are rendered as `?`.
    fn fmt(&'a self, net: &'n Network) -> Self::Formatter;
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for DeviceId {
    type Formatter = &'n str;

    fn fmt(&'a self, net: &'n Network) -> Self::Formatter {
        net.get_device_label(*self).unwrap_or("?")
    }
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for LinkId {
    type Formatter = String;

    fn fmt(&'a self, net: &'n Network) -> Self::Formatter {
        match net.get_link(*self) {
            Ok(link) => format!("{} -- {}", link.source().fmt(net), link.target().fmt(net)),
            Err(_) => String::from("?"),
        }
    }
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for Vec<DeviceId> {
    type Formatter = String;

    fn fmt(&'a self, net: &'n Network) -> Self::Formatter {
        format!("[{}]", self.iter().map(|d| d.fmt(net)).join(", "))
    }
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for HashSet<DeviceId> {
    type Formatter = String;

    fn fmt(&'a self, net: &'n Network) -> Self::Formatter {
        format!("{{{}}}", self.iter().map(|d| d.fmt(net)).join(", "))
    }
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for BTreeSet<DeviceId> {
    type Formatter = String;

    fn fmt(&'a self, net: &'n Network) -> Self::Formatter {
        format!("{{{}}}", self.iter().map(|d| d.fmt(net)).join(", "))
    }
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for NetworkEvent {
    type Formatter = String;

    fn fmt(&'a self, net: &'n Network) -> Self::Formatter {
        match self {
            NetworkEvent::DeviceAdded(d) => format!("DeviceAdded({})", d.fmt(net)),
            NetworkEvent::DeviceRemoved(d) => format!("DeviceRemoved({d:?})"),
            NetworkEvent::LinkAdded(l) => format!("LinkAdded({})", l.fmt(net)),
            NetworkEvent::LinkRemoved(l) => format!("LinkRemoved({l:?})"),
            NetworkEvent::PhaseChanged(p) => format!("PhaseChanged({p})"),
            NetworkEvent::TickCompleted(s) => format!(
                "TickCompleted({} pps, {:.1} MB/s, {} ms)",
                s.packets_per_second, s.bandwidth_mbps, s.latency_ms
            ),
        }
    }
}
