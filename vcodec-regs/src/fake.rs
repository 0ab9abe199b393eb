// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fake codec register space for unit tests.

use crate::{PowerControl, PowerStatus, RegisterIo};
use std::{collections::BTreeMap, sync::Mutex};

/// A status register whose `ON` bit follows writes to a control register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct StatusLink {
    control: usize,
    /// How many reads of the status register still return the old value after a control write.
    latency: usize,
}

/// A pending status change, applied once `remaining_reads` reaches zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PendingStatus {
    value: u32,
    remaining_reads: usize,
}

/// One access to the fake register space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    /// A read of the given offset, with the value returned.
    Read(usize, u32),
    /// A write of the given value to the given offset.
    Write(usize, u32),
}

#[derive(Debug, Default)]
struct State {
    values: BTreeMap<usize, u32>,
    links: BTreeMap<usize, StatusLink>,
    pending: BTreeMap<usize, PendingStatus>,
    accesses: Vec<Access>,
}

/// A fake register space backed by a map, which records every access.
///
/// Registers which were never written read as zero. Status registers can be linked to a control
/// register with [`FakeRegisters::link_status`] so that they model the hardware handshake.
#[derive(Debug, Default)]
pub struct FakeRegisters {
    state: Mutex<State>,
}

impl FakeRegisters {
    /// Creates an empty fake register space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `ON` bit of the `status` register follow power requests written to `control`.
    ///
    /// After a control write, `latency` reads of `status` still return the previous value.
    pub fn link_status(&self, control: usize, status: usize, latency: usize) {
        self.state
            .lock()
            .unwrap()
            .links
            .insert(status, StatusLink { control, latency });
    }

    /// Stops the `status` register from following its control register.
    ///
    /// Any status change which is still pending is dropped, so the register keeps its current
    /// value.
    pub fn unlink_status(&self, status: usize) {
        let mut state = self.state.lock().unwrap();
        state.links.remove(&status);
        state.pending.remove(&status);
    }

    /// Sets the raw value of a register without recording an access.
    pub fn set(&self, offset: usize, value: u32) {
        self.state.lock().unwrap().values.insert(offset, value);
    }

    /// Returns the raw value of a register without recording an access.
    pub fn get(&self, offset: usize) -> u32 {
        self.state
            .lock()
            .unwrap()
            .values
            .get(&offset)
            .copied()
            .unwrap_or(0)
    }

    /// Returns every access made so far, in order.
    pub fn accesses(&self) -> Vec<Access> {
        self.state.lock().unwrap().accesses.clone()
    }

    /// Returns the values written so far to the given offset, in order.
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.accesses()
            .into_iter()
            .filter_map(|access| match access {
                Access::Write(o, value) if o == offset => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of reads of the given offset made so far.
    pub fn reads_of(&self, offset: usize) -> usize {
        self.accesses()
            .into_iter()
            .filter(|access| matches!(access, Access::Read(o, _) if *o == offset))
            .count()
    }

    /// Forgets all recorded accesses, keeping register values and links.
    pub fn clear_accesses(&self) {
        self.state.lock().unwrap().accesses.clear();
    }
}

impl RegisterIo for FakeRegisters {
    fn read(&self, offset: usize) -> u32 {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        if let Some(pending) = state.pending.get_mut(&offset) {
            if pending.remaining_reads == 0 {
                let value = pending.value;
                state.pending.remove(&offset);
                state.values.insert(offset, value);
            } else {
                pending.remaining_reads -= 1;
            }
        }
        let value = state.values.get(&offset).copied().unwrap_or(0);
        state.accesses.push(Access::Read(offset, value));
        value
    }

    fn write(&self, offset: usize, value: u32) {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.values.insert(offset, value);
        state.accesses.push(Access::Write(offset, value));

        let linked: Vec<(usize, StatusLink)> = state
            .links
            .iter()
            .filter(|(_, link)| link.control == offset)
            .map(|(status, link)| (*status, *link))
            .collect();
        for (status, link) in linked {
            let current = PowerStatus::from_bits_retain(
                state.values.get(&status).copied().unwrap_or(0),
            );
            let on = !PowerControl::from_bits_retain(value).contains(PowerControl::OFF);
            let target = if on {
                current | PowerStatus::ON
            } else {
                current - PowerStatus::ON
            };
            state.pending.insert(
                status,
                PendingStatus {
                    value: target.bits(),
                    remaining_reads: link.latency,
                },
            );
        }
    }
}
