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

//! Module containing the synthetic traffic metrics and their bounded history.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Number of samples the metrics history retains. The oldest sample is evicted on overflow.
pub const METRICS_HISTORY_CAPACITY: usize = 20;

/// One synthetic traffic measurement, produced once per tick while the simulation is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSample {
    /// Wall-clock time the sample was produced at.
    pub timestamp: OffsetDateTime,
    /// Packets per second, in `[100, 1100)`.
    pub packets_per_second: u64,
    /// Bandwidth in MB/s, in `[20, 120)`.
    pub bandwidth_mbps: f64,
    /// Latency in milliseconds, in `[10, 60)`.
    pub latency_ms: u64,
}

impl TrafficSample {
    /// Draw a fresh sample from the given random source.
    pub(crate) fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            packets_per_second: rng.gen_range(100..1100),
            bandwidth_mbps: rng.gen_range(20.0..120.0),
            latency_ms: rng.gen_range(10..60),
        }
    }
}

/// Bounded, chronologically ordered sequence of [`TrafficSample`]s (a ring buffer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsHistory {
    samples: VecDeque<TrafficSample>,
    capacity: usize,
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(METRICS_HISTORY_CAPACITY)
    }
}

impl MetricsHistory {
    /// Create an empty history holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Get the number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample is retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the most recent sample.
    pub fn latest(&self) -> Option<&TrafficSample> {
        self.samples.back()
    }

    /// Iterate over the retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrafficSample> {
        self.samples.iter()
    }

    /// Append a sample, evicting the oldest one if the history is full.
    pub(crate) fn push(&mut self, sample: TrafficSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Discard all samples.
    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }
}
