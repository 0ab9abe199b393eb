// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! First generation: the shared clocks are the only power resource.

use super::PowerState;
use crate::{clocks::ClockSet, error::PmError, platform::VcodecDevice};

#[derive(Debug)]
pub(super) struct V1Pm<D: VcodecDevice> {
    clocks: ClockSet<D::Clock>,
}

impl<D: VcodecDevice> V1Pm<D> {
    pub(super) fn get(dev: &D) -> Result<Self, PmError> {
        Ok(Self {
            clocks: ClockSet::acquire(dev)?,
        })
    }

    pub(super) fn power(&self, state: PowerState) -> Result<(), PmError> {
        match state {
            PowerState::On => self.clocks.enable_all(),
            PowerState::Off => {
                self.clocks.disable_all();
                Ok(())
            }
        }
    }
}
