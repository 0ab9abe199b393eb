// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power sequencing for hardware video codec subsystems.
//!
//! The surrounding driver implements [`VcodecDevice`] for its device, picks a strategy once with
//! [`PmOps::for_device`] or [`PmOps::for_version`], and then drives runtime power transitions
//! through the [`PmSession`] returned by [`PmOps::get_pm`]:
//!
//! - generation 1 only has shared clocks,
//! - generation 3 adds per-session clocks switched behind a power control bit,
//! - generation 4 powers two codec cores with a polled register handshake, each in its own power
//!   domain, and links the shared power domain to the device.
//!
//! Unknown generations are sequenced as generation 1.

#![cfg_attr(not(test), no_std)]

pub mod clocks;
pub mod cores;
pub mod error;
pub mod handshake;
pub mod link;
pub mod logger;
pub mod platform;
pub mod strategy;

pub use error::{ErrorCode, PmError};
pub use platform::VcodecDevice;
pub use strategy::{HfiVersion, PmOps, PmSession, PowerState, SessionType};
