// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power handshake with the codec wrapper logic through its control and status registers.

use crate::{error::PmError, platform::Delay};
use log::trace;
use vcodec_regs::{PowerControl, PowerStatus, RegisterIo};

/// Polling parameters for a status register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HandshakeTiming {
    /// Time to wait between two reads of the status register.
    pub poll_interval_us: u32,
    /// Total time budget for the status register to reach the requested value.
    pub timeout_us: u32,
}

impl HandshakeTiming {
    /// Timing used by the codec core power handshake.
    pub const CORE: Self = Self {
        poll_interval_us: 1,
        timeout_us: 100,
    };

    /// Returns the number of status reads made before giving up.
    pub const fn max_polls(&self) -> u32 {
        if self.poll_interval_us == 0 || self.timeout_us < self.poll_interval_us {
            1
        } else {
            self.timeout_us / self.poll_interval_us
        }
    }
}

impl Default for HandshakeTiming {
    fn default() -> Self {
        Self::CORE
    }
}

/// Writes the power request to `control` without waiting for any acknowledgement.
///
/// Used on hardware generations which have no status register.
pub fn set_control_bit(regs: &impl RegisterIo, control: usize, assert: bool) {
    regs.write(control, PowerControl::request(assert).bits());
}

/// Writes the power request to `control`, then polls `status` until its `ON` bit matches the
/// request.
///
/// Exactly `timing.max_polls()` reads are made before returning `PmError::HandshakeTimeout`, with a
/// delay of `timing.poll_interval_us` after each read which does not match. The timeout is not
/// retried.
pub fn set_control_bit_and_wait_status(
    regs: &impl RegisterIo,
    delay: &impl Delay,
    control: usize,
    status: usize,
    assert: bool,
    timing: HandshakeTiming,
) -> Result<(), PmError> {
    set_control_bit(regs, control, assert);

    for poll in 0..timing.max_polls() {
        let value = PowerStatus::from_bits_retain(regs.read(status));
        if value.contains(PowerStatus::ON) == assert {
            trace!("Power status {status:#x} reached {value:?} after {poll} polls");
            return Ok(());
        }
        delay.delay_us(timing.poll_interval_us);
    }

    Err(PmError::HandshakeTimeout { control })
}
