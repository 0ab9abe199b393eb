// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Third generation: the shared clocks, plus a clock for each session type which is only switched
//! while the session's power control bit is asserted.
//!
//! There is no status register on this generation, so the control bit is written without waiting
//! for an acknowledgement.

use super::{PowerState, SessionType};
use crate::{
    clocks::ClockSet,
    error::{ErrorCode, PmError, Resource},
    handshake::set_control_bit,
    platform::{Clock, VcodecDevice},
};
use log::debug;

/// Name of the clock of both session types.
const SESSION_CLOCK: &str = "core";

#[derive(Debug)]
pub(super) struct V3Pm<D: VcodecDevice> {
    clocks: ClockSet<D::Clock>,
    vdec: Option<D::Clock>,
    venc: Option<D::Clock>,
}

impl<D: VcodecDevice> V3Pm<D> {
    pub(super) fn get(dev: &D) -> Result<Self, PmError> {
        Ok(Self {
            clocks: ClockSet::acquire(dev)?,
            vdec: None,
            venc: None,
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

    fn slot(&self, session: SessionType) -> &Option<D::Clock> {
        match session {
            SessionType::Decoder => &self.vdec,
            SessionType::Encoder => &self.venc,
        }
    }

    /// Resolves the session's clock, replacing any clock resolved earlier.
    pub(super) fn session_get(&mut self, dev: &D, session: SessionType) -> Result<(), PmError> {
        let clock = dev
            .clk_get(SESSION_CLOCK)
            .map_err(|code| PmError::ResourceUnavailable {
                resource: Resource::SessionClock(session),
                code,
            })?;
        match session {
            SessionType::Decoder => self.vdec = Some(clock),
            SessionType::Encoder => self.venc = Some(clock),
        }
        Ok(())
    }

    /// Switches the session's clock with the power control bit asserted.
    ///
    /// The bit is always de-asserted again, even if the clock failed to enable.
    pub(super) fn session_power(
        &self,
        dev: &D,
        session: SessionType,
        state: PowerState,
    ) -> Result<(), PmError> {
        let clock = self
            .slot(session)
            .as_ref()
            .ok_or(PmError::ResourceUnavailable {
                resource: Resource::SessionClock(session),
                code: ErrorCode::ENODEV,
            })?;
        let regs = dev.registers();
        let control = session.control_register();
        debug!("Powering {session} {state:?}");

        set_control_bit(regs, control, true);
        let result = match state {
            PowerState::On => clock.enable().map_err(|code| PmError::ClockEnable {
                resource: Resource::SessionClock(session),
                code,
            }),
            PowerState::Off => {
                clock.disable();
                Ok(())
            }
        };
        set_control_bit(regs, control, false);

        result
    }
}
