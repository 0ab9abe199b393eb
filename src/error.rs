// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Error values returned by the power sequencing code.

use crate::{cores::CoreId, strategy::SessionType};
use core::fmt::{self, Display, Formatter};
use thiserror::Error;

/// A negative errno-style status code, as returned by platform capabilities and as reported to
/// the runtime power management framework.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    /// No such device.
    pub const ENODEV: Self = Self(-19);
    /// Invalid argument.
    pub const EINVAL: Self = Self(-22);
    /// Connection timed out.
    pub const ETIMEDOUT: Self = Self(-110);
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resource which the power sequencing code acquires from the platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resource {
    /// The shared clock at the given index of the device's clock table.
    SharedClock(usize),
    /// The core clock of a codec core.
    CoreClock(CoreId),
    /// The bus clock of a codec core.
    CoreBusClock(CoreId),
    /// The clock of a decode or encode session, on generation 3 hardware.
    SessionClock(SessionType),
    /// The power domain shared by the whole subsystem.
    SharedDomain,
    /// The power domain of a codec core.
    CoreDomain(CoreId),
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::SharedClock(index) => write!(f, "shared clock {index}"),
            Self::CoreClock(core) => write!(f, "{core} clock"),
            Self::CoreBusClock(core) => write!(f, "{core} bus clock"),
            Self::SessionClock(session) => write!(f, "{session} clock"),
            Self::SharedDomain => write!(f, "shared power domain"),
            Self::CoreDomain(core) => write!(f, "{core} power domain"),
        }
    }
}

/// An error from acquiring or sequencing power resources.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PmError {
    /// A named clock or power domain could not be resolved.
    #[error("{resource} unavailable ({code})")]
    ResourceUnavailable {
        /// The resource which could not be resolved.
        resource: Resource,
        /// The status returned by the platform.
        code: ErrorCode,
    },
    /// A clock failed to enable.
    #[error("failed to enable {resource} ({code})")]
    ClockEnable {
        /// The clock which failed.
        resource: Resource,
        /// The status returned by the platform.
        code: ErrorCode,
    },
    /// A status register did not reach the requested value in time.
    #[error("power handshake on control register {control:#x} timed out")]
    HandshakeTimeout {
        /// Offset of the control register which was written.
        control: usize,
    },
    /// A power domain could not be brought up.
    #[error("failed to acquire {resource} ({code})")]
    DomainAcquire {
        /// The domain which failed.
        resource: Resource,
        /// The status returned by the platform.
        code: ErrorCode,
    },
    /// A power domain could not be released.
    #[error("failed to release {resource} ({code})")]
    DomainRelease {
        /// The domain which failed.
        resource: Resource,
        /// The status returned by the platform.
        code: ErrorCode,
    },
    /// The device link to the shared power domain could not be created.
    #[error("adding device link to the shared power domain failed")]
    LinkCreation,
}

impl From<PmError> for ErrorCode {
    fn from(e: PmError) -> Self {
        match e {
            PmError::ResourceUnavailable { code, .. }
            | PmError::ClockEnable { code, .. }
            | PmError::DomainAcquire { code, .. }
            | PmError::DomainRelease { code, .. } => code,
            PmError::HandshakeTimeout { .. } => ErrorCode::ETIMEDOUT,
            PmError::LinkCreation => ErrorCode::ENODEV,
        }
    }
}
