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

//! Definition of the 48-bit MAC address used as key of the forwarding table.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// A 48-bit MAC address. The canonical representation (used by both `Display` and `FromStr`) is
/// colon-separated lowercase hex, e.g. `02:1a:04:00:00:2a`. The address is serialized in its
/// canonical string form.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a new MAC address from its six octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Get the six octets of the address.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({self})")
    }
}

/// Error while parsing a [`MacAddress`] from a string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseMacError {
    /// The address does not consist of exactly six colon-separated groups.
    #[error("Expected six colon-separated groups, got {0}")]
    InvalidGroupCount(usize),
    /// One of the groups is not a valid hex octet.
    #[error("Invalid hex octet: {0}")]
    InvalidOctet(String),
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups: Vec<&str> = s.split(':').collect();
        if groups.len() != 6 {
            return Err(ParseMacError::InvalidGroupCount(groups.len()));
        }
        let mut octets = [0u8; 6];
        for (octet, group) in octets.iter_mut().zip(groups) {
            *octet = u8::from_str_radix(group, 16)
                .map_err(|_| ParseMacError::InvalidOctet(group.to_string()))?;
        }
        Ok(Self(octets))
    }
}
