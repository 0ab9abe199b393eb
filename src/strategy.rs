// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Selection of the power sequencing strategy for a hardware generation, and the per-device
//! session which holds the resources it resolves.

mod v1;
mod v3;
mod v4;

use crate::{error::PmError, platform::VcodecDevice};
use core::fmt::{self, Display, Formatter};
use log::{error, info};
use num_enum::{FromPrimitive, IntoPrimitive};
use v1::V1Pm;
use v3::V3Pm;
use v4::V4Pm;
use vcodec_regs::{WRAPPER_VDEC_VCODEC_POWER_CONTROL, WRAPPER_VENC_VCODEC_POWER_CONTROL};

/// Generation of the host firmware interface spoken by the codec.
///
/// Identifiers which are not recognised are treated as the first generation.
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, IntoPrimitive, PartialEq)]
#[repr(u32)]
pub enum HfiVersion {
    /// First generation: shared clocks only.
    #[num_enum(default)]
    V1xx = 0,
    /// Third generation: shared clocks and per-session codec power control.
    V3xx = 1,
    /// Fourth generation: shared clocks, two independently powered cores and power domains.
    V4xx = 2,
}

/// The kind of codec session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionType {
    /// A decode session.
    Decoder,
    /// An encode session.
    Encoder,
}

impl SessionType {
    /// Returns the offset of the session's power control register on generation 3 hardware.
    pub const fn control_register(self) -> usize {
        match self {
            Self::Decoder => WRAPPER_VDEC_VCODEC_POWER_CONTROL,
            Self::Encoder => WRAPPER_VENC_VCODEC_POWER_CONTROL,
        }
    }
}

impl Display for SessionType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Decoder => f.write_str("decoder"),
            Self::Encoder => f.write_str("encoder"),
        }
    }
}

/// A requested power state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerState {
    /// Powered and clocked.
    On,
    /// Unclocked and released.
    Off,
}

/// A power sequencing strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PmOps {
    /// Shared clocks only.
    V1,
    /// Shared clocks, plus per-session clocks behind an unacknowledged power control bit.
    V3,
    /// Shared clocks, then each core with a polled power handshake, with a device link keeping the
    /// shared power domain active.
    V4,
}

impl PmOps {
    /// Returns the strategy for the given hardware generation.
    pub const fn for_version(version: HfiVersion) -> Self {
        match version {
            HfiVersion::V1xx => Self::V1,
            HfiVersion::V3xx => Self::V3,
            HfiVersion::V4xx => Self::V4,
        }
    }

    /// Returns the strategy for the generation described by the device's resource table.
    pub fn for_device<D: VcodecDevice>(dev: &D) -> Self {
        Self::for_version(dev.resources().hfi_version)
    }

    /// Resolves every resource the strategy needs for `dev`.
    ///
    /// Nothing is enabled. On failure, anything already attached to the device is detached again.
    pub fn get_pm<D: VcodecDevice>(self, dev: &D) -> Result<PmSession<'_, D>, PmError> {
        let backend = match self {
            Self::V1 => Backend::V1(V1Pm::get(dev)?),
            Self::V3 => Backend::V3(V3Pm::get(dev)?),
            Self::V4 => Backend::V4(V4Pm::get(dev)?),
        };
        info!("Acquired {self:?} power resources");
        Ok(PmSession {
            dev,
            backend,
            state: None,
        })
    }
}

#[derive(Debug)]
enum Backend<D: VcodecDevice> {
    V1(V1Pm<D>),
    V3(V3Pm<D>),
    V4(V4Pm<D>),
}

/// The power resources of one codec device, from `PmOps::get_pm` until `PmSession::put_pm`.
///
/// Transitions take `&mut self`, so two transitions for the same device cannot overlap.
#[derive(Debug)]
pub struct PmSession<'a, D: VcodecDevice> {
    dev: &'a D,
    backend: Backend<D>,
    state: Option<PowerState>,
}

impl<D: VcodecDevice> PmSession<'_, D> {
    /// Returns the strategy in effect.
    pub fn ops(&self) -> PmOps {
        match self.backend {
            Backend::V1(_) => PmOps::V1,
            Backend::V3(_) => PmOps::V3,
            Backend::V4(_) => PmOps::V4,
        }
    }

    /// Returns the last power state which was successfully requested, if any.
    pub fn state(&self) -> Option<PowerState> {
        self.state
    }

    /// Powers the subsystem on or off.
    pub fn power(&mut self, state: PowerState) -> Result<(), PmError> {
        let result = match &self.backend {
            Backend::V1(pm) => pm.power(state),
            Backend::V3(pm) => pm.power(state),
            Backend::V4(pm) => pm.power(self.dev, state),
        };
        match result {
            Ok(()) => {
                info!("Codec power {state:?}");
                self.state = Some(state);
            }
            Err(e) => error!("Codec power {state:?} failed: {e}"),
        }
        result
    }

    /// Releases everything which `get_pm` attached to the device.
    pub fn put_pm(self) {
        let ops = self.ops();
        if let Backend::V4(pm) = self.backend {
            pm.put(self.dev);
        }
        info!("Released {ops:?} power resources");
    }

    /// Resolves the decoder session clock.
    pub fn vdec_get_pm(&mut self) -> Result<(), PmError> {
        self.session_get_pm(SessionType::Decoder)
    }

    /// Powers the decoder session on or off.
    pub fn vdec_power(&mut self, state: PowerState) -> Result<(), PmError> {
        self.session_power(SessionType::Decoder, state)
    }

    /// Resolves the encoder session clock.
    pub fn venc_get_pm(&mut self) -> Result<(), PmError> {
        self.session_get_pm(SessionType::Encoder)
    }

    /// Powers the encoder session on or off.
    pub fn venc_power(&mut self, state: PowerState) -> Result<(), PmError> {
        self.session_power(SessionType::Encoder, state)
    }

    fn session_get_pm(&mut self, session: SessionType) -> Result<(), PmError> {
        match &mut self.backend {
            Backend::V3(pm) => pm.session_get(self.dev, session),
            Backend::V1(_) | Backend::V4(_) => Ok(()),
        }
    }

    fn session_power(&mut self, session: SessionType, state: PowerState) -> Result<(), PmError> {
        match &self.backend {
            Backend::V3(pm) => pm.session_power(self.dev, session, state),
            Backend::V1(_) | Backend::V4(_) => Ok(()),
        }
    }
}
