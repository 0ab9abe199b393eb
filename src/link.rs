// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Runtime power dependency between the codec device and its shared power domain.

use crate::{error::PmError, platform::VcodecDevice};
use bitflags::bitflags;
use log::{error, info};

bitflags! {
    /// Flags passed when creating a device link.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct DeviceLinkFlags: u32 {
        /// The link does not track any driver binding state.
        const STATELESS = 1 << 0;
        /// Runtime power management of the consumer also resumes and suspends the supplier.
        const PM_RUNTIME = 1 << 2;
        /// The supplier is resumed when the link is created.
        const RPM_ACTIVE = 1 << 3;
    }
}

impl DeviceLinkFlags {
    /// Flags used for the link to the shared power domain.
    pub const SHARED_DOMAIN: Self = Self::PM_RUNTIME
        .union(Self::STATELESS)
        .union(Self::RPM_ACTIVE);
}

/// A device link which keeps a power domain active while the codec device is.
#[derive(Debug)]
pub struct PowerDomainLink<L> {
    link: L,
}

impl<L> PowerDomainLink<L> {
    /// Makes the device a runtime power consumer of `domain`.
    pub fn establish<D: VcodecDevice<DeviceLink = L>>(
        dev: &D,
        domain: &D::PowerDomain,
        flags: DeviceLinkFlags,
    ) -> Result<Self, PmError> {
        match dev.device_link_add(domain, flags) {
            Some(link) => {
                info!("Linked to shared power domain with {flags:?}");
                Ok(Self { link })
            }
            None => {
                error!("Adding venus device link failed");
                Err(PmError::LinkCreation)
            }
        }
    }

    /// Removes the link.
    pub fn teardown<D: VcodecDevice<DeviceLink = L>>(self, dev: &D) {
        dev.device_link_del(self.link);
    }
}
