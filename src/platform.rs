// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Capabilities which the surrounding driver provides to the power sequencing code.


use crate::{error::ErrorCode, link::DeviceLinkFlags, strategy::HfiVersion};
use core::fmt::Debug;
use vcodec_regs::RegisterIo;

/// A clock handle resolved by name from the device's clock provider.
pub trait Clock {
    /// Prepares and enables the clock.
    fn enable(&self) -> Result<(), ErrorCode>;

    /// Disables and unprepares the clock.
    ///
    /// Disabling a clock is not expected to fail on this hardware, so no status is returned.
    fn disable(&self);
}

/// A power domain attached to the device by name.
///
/// Acquire and release are reference counted by the runtime power management framework.
pub trait PowerDomain {
    /// Resumes the domain, blocking until it is active.
    fn acquire(&self) -> Result<(), ErrorCode>;

    /// Drops a reference to the domain, suspending it synchronously if it was the last one.
    fn release(&self) -> Result<(), ErrorCode>;
}

/// A source of short busy-wait delays.
pub trait Delay {
    /// Busy-waits for at least `us` microseconds.
    fn delay_us(&self, us: u32);
}

/// Static description of the power resources of a particular chip.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resources {
    /// Names of the shared clocks, in enable order.
    pub clocks: &'static [&'static str],
    /// Generation of the host firmware interface, which determines the power sequencing strategy.
    pub hfi_version: HfiVersion,
}

/// MSM8916: generation 1, shared clocks only.
pub const MSM8916: Resources = Resources {
    clocks: &["core", "iface", "bus"],
    hfi_version: HfiVersion::V1xx,
};

/// MSM8996: generation 3, shared clocks plus per-session codec power control.
pub const MSM8996: Resources = Resources {
    clocks: &["core", "iface", "bus", "mbus"],
    hfi_version: HfiVersion::V3xx,
};

/// SDM845: generation 4, shared clocks plus two independently powered codec cores.
pub const SDM845: Resources = Resources {
    clocks: &["core", "iface", "bus"],
    hfi_version: HfiVersion::V4xx,
};

/// The hooks which the surrounding driver implements for one codec device.
///
/// Every method is called on the thread handling the device's runtime power transitions, which
/// never runs two transitions for the same device at once.
pub trait VcodecDevice: Debug {
    /// Clock handle type.
    type Clock: Clock + Debug;

    /// Power domain handle type.
    type PowerDomain: PowerDomain + Debug;

    /// Handle of a device link between this device and a power domain.
    type DeviceLink: Debug;

    /// Register space of the codec.
    type Registers: RegisterIo + Debug;

    /// Busy-wait delay provider used while polling registers.
    type Delay: Delay + Debug;

    /// Returns the static resource description of the device.
    fn resources(&self) -> &Resources;

    /// Resolves the clock with the given name.
    fn clk_get(&self, name: &'static str) -> Result<Self::Clock, ErrorCode>;

    /// Attaches the power domain with the given name to the device.
    fn pm_domain_attach_by_name(&self, name: &'static str) -> Result<Self::PowerDomain, ErrorCode>;

    /// Detaches a power domain previously attached with `pm_domain_attach_by_name`, powering it
    /// off if nothing else holds it.
    fn pm_domain_detach(&self, domain: Self::PowerDomain);

    /// Adds a device link making the device a consumer of `supplier`.
    ///
    /// Returns `None` if the link could not be created.
    fn device_link_add(
        &self,
        supplier: &Self::PowerDomain,
        flags: DeviceLinkFlags,
    ) -> Option<Self::DeviceLink>;

    /// Removes a device link previously added with `device_link_add`.
    fn device_link_del(&self, link: Self::DeviceLink);

    /// Returns the codec register space.
    fn registers(&self) -> &Self::Registers;

    /// Returns the delay provider.
    fn delay(&self) -> &Self::Delay;
}
