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

//! Module containing the periodic driver of the simulation.
//!
//! The clock is a plain worker thread that fires [`crate::network::Network::tick`] on the
//! shared network once per tick interval. The kill channel doubles as the tick timer: waiting
//! for the kill signal with a timeout of one interval either delivers the signal (terminate) or
//! times out (tick). Cancellation joins the worker, so once [`SimulationClock::cancel`] returns
//! it is guaranteed that no further tick fires.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::*;

use crate::network::Network;
use crate::session::lock;
use crate::types::Phase;

/// Handle of the ticker thread driving a network.
#[derive(Debug)]
pub(crate) struct SimulationClock {
    kill_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl SimulationClock {
    /// Spawn a ticker thread firing on `net` every `interval` for as long as the network phase
    /// is [`Phase::Running`].
    pub(crate) fn spawn(net: Arc<Mutex<Network>>, interval: Duration) -> Self {
        let (kill_tx, kill_rx) = channel();
        let handle = std::thread::spawn(move || {
            debug!("Clock started with an interval of {interval:?}");
            loop {
                match kill_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let mut net = lock(&net);
                        // the phase may have changed between the timeout and acquiring the lock.
                        if net.phase() == Phase::Running {
                            net.tick();
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("Clock terminated");
        });
        Self { kill_tx, handle }
    }

    /// Terminate the ticker thread and wait for it to finish. After this function returns, no
    /// further tick fires.
    pub(crate) fn cancel(self) {
        let _ = self.kill_tx.send(());
        let _ = self.handle.join();
    }
}
