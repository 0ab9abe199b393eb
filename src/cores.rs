// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power sequencing of the individual codec cores on generation 4 hardware.

use crate::{
    error::{PmError, Resource},
    handshake::{HandshakeTiming, set_control_bit_and_wait_status},
    platform::{Clock, PowerDomain, VcodecDevice},
};
use bitflags::bitflags;
use core::fmt::{self, Display, Formatter};
use log::{debug, error};
use vcodec_regs::{
    WRAPPER_VCODEC0_MMCC_POWER_CONTROL, WRAPPER_VCODEC0_MMCC_POWER_STATUS,
    WRAPPER_VCODEC1_MMCC_POWER_CONTROL, WRAPPER_VCODEC1_MMCC_POWER_STATUS,
};

/// One of the codec execution cores.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum CoreId {
    /// The first core, named `vcodec0` by the hardware.
    Core1,
    /// The second core, named `vcodec1` by the hardware.
    Core2,
}

bitflags! {
    /// A set of codec cores.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct CoreMask: u32 {
        /// The first core.
        const CORE_1 = 1 << 0;
        /// The second core.
        const CORE_2 = 1 << 1;
    }
}

impl CoreId {
    /// All cores, in sequencing order.
    pub const ALL: [Self; 2] = [Self::Core1, Self::Core2];

    /// Returns the mask bit for this core.
    pub const fn mask(self) -> CoreMask {
        match self {
            Self::Core1 => CoreMask::CORE_1,
            Self::Core2 => CoreMask::CORE_2,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Core1 => 0,
            Self::Core2 => 1,
        }
    }

    /// Returns the offset of the core's power control register.
    pub const fn control_register(self) -> usize {
        match self {
            Self::Core1 => WRAPPER_VCODEC0_MMCC_POWER_CONTROL,
            Self::Core2 => WRAPPER_VCODEC1_MMCC_POWER_CONTROL,
        }
    }

    /// Returns the offset of the core's power status register.
    pub const fn status_register(self) -> usize {
        match self {
            Self::Core1 => WRAPPER_VCODEC0_MMCC_POWER_STATUS,
            Self::Core2 => WRAPPER_VCODEC1_MMCC_POWER_STATUS,
        }
    }

    /// Returns the name of the core's clock.
    pub const fn clock_name(self) -> &'static str {
        match self {
            Self::Core1 => "vcodec0_core",
            Self::Core2 => "vcodec1_core",
        }
    }

    /// Returns the name of the core's bus clock.
    pub const fn bus_clock_name(self) -> &'static str {
        match self {
            Self::Core1 => "vcodec0_bus",
            Self::Core2 => "vcodec1_bus",
        }
    }

    /// Returns the name of the core's power domain.
    pub const fn domain_name(self) -> &'static str {
        match self {
            Self::Core1 => "vcodec0",
            Self::Core2 => "vcodec1",
        }
    }
}

impl Display for CoreId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "core {}", self.index() + 1)
    }
}

impl CoreMask {
    /// Returns the cores in the mask, in sequencing order.
    pub fn cores(self) -> impl Iterator<Item = CoreId> {
        CoreId::ALL
            .into_iter()
            .filter(move |core| self.contains(core.mask()))
    }
}

/// The clocks and power domain of one codec core.
#[derive(Debug)]
pub struct CoreResources<D: VcodecDevice> {
    clock: D::Clock,
    bus_clock: D::Clock,
    domain: D::PowerDomain,
}

impl<D: VcodecDevice> CoreResources<D> {
    /// Groups the resources of one core.
    pub fn new(clock: D::Clock, bus_clock: D::Clock, domain: D::PowerDomain) -> Self {
        Self {
            clock,
            bus_clock,
            domain,
        }
    }
}

/// Resolves the core and bus clocks of a core.
pub fn get_core_clocks<D: VcodecDevice>(
    dev: &D,
    core: CoreId,
) -> Result<(D::Clock, D::Clock), PmError> {
    let clock = dev
        .clk_get(core.clock_name())
        .map_err(|code| PmError::ResourceUnavailable {
            resource: Resource::CoreClock(core),
            code,
        })?;
    let bus_clock = dev
        .clk_get(core.bus_clock_name())
        .map_err(|code| PmError::ResourceUnavailable {
            resource: Resource::CoreBusClock(core),
            code,
        })?;
    Ok((clock, bus_clock))
}

/// Brings the codec cores up and down.
///
/// Power on stops at the first failure without undoing the steps already taken for that core or
/// for earlier cores. Power off frees as much as it can for a core before reporting a failure.
#[derive(Debug)]
pub struct CoreSequencer<D: VcodecDevice> {
    cores: [CoreResources<D>; 2],
    timing: HandshakeTiming,
}

impl<D: VcodecDevice> CoreSequencer<D> {
    /// Creates a sequencer for the two cores, using the hardware's handshake timing.
    pub fn new(core1: CoreResources<D>, core2: CoreResources<D>) -> Self {
        Self {
            cores: [core1, core2],
            timing: HandshakeTiming::CORE,
        }
    }

    /// Consumes the sequencer, returning the power domains of both cores in core order.
    pub fn into_domains(self) -> [D::PowerDomain; 2] {
        self.cores.map(|core| core.domain)
    }

    fn handshake(&self, dev: &D, core: CoreId, assert: bool) -> Result<(), PmError> {
        set_control_bit_and_wait_status(
            dev.registers(),
            dev.delay(),
            core.control_register(),
            core.status_register(),
            assert,
            self.timing,
        )
    }

    /// Powers on every core in `mask`, the first core completely before the second.
    pub fn power_on(&self, dev: &D, mask: CoreMask) -> Result<(), PmError> {
        for core in mask.cores() {
            self.power_on_core(dev, core)?;
        }
        Ok(())
    }

    /// Powers off every core in `mask`, stopping at the first core which fails.
    pub fn power_off(&self, dev: &D, mask: CoreMask) -> Result<(), PmError> {
        for core in mask.cores() {
            self.power_off_core(dev, core)?;
        }
        Ok(())
    }

    fn power_on_core(&self, dev: &D, core: CoreId) -> Result<(), PmError> {
        let resources = &self.cores[core.index()];
        debug!("Powering on {core}");

        resources
            .domain
            .acquire()
            .map_err(|code| PmError::DomainAcquire {
                resource: Resource::CoreDomain(core),
                code,
            })?;

        self.handshake(dev, core, true)?;

        resources
            .clock
            .enable()
            .map_err(|code| PmError::ClockEnable {
                resource: Resource::CoreClock(core),
                code,
            })?;
        resources
            .bus_clock
            .enable()
            .map_err(|code| PmError::ClockEnable {
                resource: Resource::CoreBusClock(core),
                code,
            })?;

        self.handshake(dev, core, false)
    }

    fn power_off_core(&self, dev: &D, core: CoreId) -> Result<(), PmError> {
        let resources = &self.cores[core.index()];
        debug!("Powering off {core}");

        self.handshake(dev, core, true)?;

        resources.bus_clock.disable();
        resources.clock.disable();

        if let Err(e) = self.handshake(dev, core, false) {
            error!("Power off {core} failed: {e}");
        }

        resources
            .domain
            .release()
            .map_err(|code| PmError::DomainRelease {
                resource: Resource::CoreDomain(core),
                code,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorCode,
        platform::{
            SDM845,
            test::{Event, FakeDevice},
        },
    };

    const ASSERT: u32 = 0;
    const DEASSERT: u32 = 1;

    fn sequencer(dev: &FakeDevice) -> CoreSequencer<FakeDevice> {
        let [core1, core2] = CoreId::ALL.map(|core| {
            let (clock, bus_clock) = get_core_clocks(dev, core).unwrap();
            let domain = dev.pm_domain_attach_by_name(core.domain_name()).unwrap();
            CoreResources::new(clock, bus_clock, domain)
        });
        dev.clear_events();
        CoreSequencer::new(core1, core2)
    }

    fn power_on_events(core: CoreId) -> Vec<Event> {
        vec![
            Event::DomainAcquire(core.domain_name()),
            Event::RegWrite(core.control_register(), ASSERT),
            Event::ClkEnable(core.clock_name()),
            Event::ClkEnable(core.bus_clock_name()),
            Event::RegWrite(core.control_register(), DEASSERT),
        ]
    }

    fn power_off_events(core: CoreId) -> Vec<Event> {
        vec![
            Event::RegWrite(core.control_register(), ASSERT),
            Event::ClkDisable(core.bus_clock_name()),
            Event::ClkDisable(core.clock_name()),
            Event::RegWrite(core.control_register(), DEASSERT),
            Event::DomainRelease(core.domain_name()),
        ]
    }

    #[test]
    fn core_mask_iteration() {
        assert_eq!(CoreMask::all().cores().collect::<Vec<_>>(), CoreId::ALL);
        assert_eq!(CoreMask::CORE_2.cores().collect::<Vec<_>>(), [CoreId::Core2]);
        assert_eq!(CoreMask::empty().cores().count(), 0);
        assert_eq!(CoreMask::from_bits_retain(0b11), CoreMask::all());
    }

    #[test]
    fn core_names() {
        assert_eq!(CoreId::Core1.to_string(), "core 1");
        assert_eq!(CoreId::Core2.to_string(), "core 2");
        assert_eq!(CoreId::Core2.domain_name(), "vcodec1");
        assert_eq!(CoreId::Core1.control_register(), 0xe_0094);
        assert_eq!(CoreId::Core2.status_register(), 0xe_0110);
    }

    #[test]
    fn get_core_clocks_reports_bus_clock() {
        let dev = FakeDevice::new(SDM845);
        dev.fail_clk_get("vcodec1_bus", ErrorCode(-2));

        assert!(get_core_clocks(&dev, CoreId::Core1).is_ok());
        assert_eq!(
            get_core_clocks(&dev, CoreId::Core2).err(),
            Some(PmError::ResourceUnavailable {
                resource: Resource::CoreBusClock(CoreId::Core2),
                code: ErrorCode(-2),
            })
        );
    }

    #[test]
    fn power_on_core1_before_core2() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);

        cores.power_on(&dev, CoreMask::all()).unwrap();

        let mut expected = power_on_events(CoreId::Core1);
        expected.extend(power_on_events(CoreId::Core2));
        assert_eq!(dev.events(), expected);
        assert_eq!(
            dev.enabled_clocks(),
            ["vcodec0_bus", "vcodec0_core", "vcodec1_bus", "vcodec1_core"]
        );
        assert_eq!(dev.acquired_domains(), ["vcodec0", "vcodec1"]);
    }

    #[test]
    fn power_on_single_core() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);

        cores.power_on(&dev, CoreMask::CORE_2).unwrap();
        assert_eq!(dev.events(), power_on_events(CoreId::Core2));

        dev.clear_events();
        cores.power_on(&dev, CoreMask::empty()).unwrap();
        assert!(dev.events().is_empty());
    }

    #[test]
    fn power_off_mirrors_power_on() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        cores.power_on(&dev, CoreMask::all()).unwrap();
        dev.clear_events();

        cores.power_off(&dev, CoreMask::all()).unwrap();

        let mut expected = power_off_events(CoreId::Core1);
        expected.extend(power_off_events(CoreId::Core2));
        assert_eq!(dev.events(), expected);
        assert!(dev.enabled_clocks().is_empty());
        assert!(dev.acquired_domains().is_empty());
    }

    #[test]
    fn power_on_domain_failure_aborts() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        dev.fail_domain_acquire("vcodec1", ErrorCode(-16));

        assert_eq!(
            cores.power_on(&dev, CoreMask::all()),
            Err(PmError::DomainAcquire {
                resource: Resource::CoreDomain(CoreId::Core2),
                code: ErrorCode(-16),
            })
        );

        // Core 1 stays powered: nothing is rolled back.
        let mut expected = power_on_events(CoreId::Core1);
        expected.push(Event::DomainAcquire("vcodec1"));
        assert_eq!(dev.events(), expected);
        assert_eq!(dev.acquired_domains(), ["vcodec0"]);
    }

    #[test]
    fn power_on_clock_failure_leaves_handshake_asserted() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        dev.fail_clk_enable("vcodec0_bus", ErrorCode(-5));

        assert_eq!(
            cores.power_on(&dev, CoreMask::all()),
            Err(PmError::ClockEnable {
                resource: Resource::CoreBusClock(CoreId::Core1),
                code: ErrorCode(-5),
            })
        );
        assert_eq!(
            dev.events(),
            [
                Event::DomainAcquire("vcodec0"),
                Event::RegWrite(CoreId::Core1.control_register(), ASSERT),
                Event::ClkEnable("vcodec0_core"),
                Event::ClkEnable("vcodec0_bus"),
            ]
        );
        assert_eq!(dev.enabled_clocks(), ["vcodec0_core"]);
        assert_eq!(dev.acquired_domains(), ["vcodec0"]);
    }

    #[test]
    fn power_on_handshake_timeout() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        dev.stall_status(CoreId::Core1);

        assert_eq!(
            cores.power_on(&dev, CoreMask::all()),
            Err(PmError::HandshakeTimeout {
                control: CoreId::Core1.control_register(),
            })
        );
        assert_eq!(
            dev.events(),
            [
                Event::DomainAcquire("vcodec0"),
                Event::RegWrite(CoreId::Core1.control_register(), ASSERT),
            ]
        );
        assert_eq!(dev.regs().reads_of(CoreId::Core1.status_register()), 100);
        assert_eq!(dev.delay().elapsed_us(), 100);
    }

    #[test]
    fn power_off_deassert_timeout_is_not_fatal() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        cores.power_on(&dev, CoreMask::all()).unwrap();
        dev.clear_events();

        // Let the assert complete, then freeze the status with the core still on.
        dev.stall_status(CoreId::Core1);
        dev.regs().set(
            CoreId::Core1.status_register(),
            vcodec_regs::PowerStatus::ON.bits(),
        );

        cores.power_off(&dev, CoreMask::all()).unwrap();

        let mut expected = power_off_events(CoreId::Core1);
        expected.extend(power_off_events(CoreId::Core2));
        assert_eq!(dev.events(), expected);
        assert!(dev.acquired_domains().is_empty());
    }

    #[test]
    fn power_off_assert_timeout_aborts() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        cores.power_on(&dev, CoreMask::all()).unwrap();
        dev.clear_events();

        // The status register reads as off, so the assert never completes.
        dev.stall_status(CoreId::Core1);
        dev.regs().set(CoreId::Core1.status_register(), 0);

        assert_eq!(
            cores.power_off(&dev, CoreMask::all()),
            Err(PmError::HandshakeTimeout {
                control: CoreId::Core1.control_register(),
            })
        );
        assert_eq!(
            dev.events(),
            [Event::RegWrite(CoreId::Core1.control_register(), ASSERT)]
        );
        assert_eq!(dev.clock_enable_count("vcodec0_core"), 1);
    }

    #[test]
    fn power_off_release_failure_skips_core2() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        cores.power_on(&dev, CoreMask::all()).unwrap();
        dev.clear_events();
        dev.fail_domain_release("vcodec0", ErrorCode(-13));

        assert_eq!(
            cores.power_off(&dev, CoreMask::all()),
            Err(PmError::DomainRelease {
                resource: Resource::CoreDomain(CoreId::Core1),
                code: ErrorCode(-13),
            })
        );
        assert_eq!(dev.events(), power_off_events(CoreId::Core1));
        assert_eq!(dev.enabled_clocks(), ["vcodec1_bus", "vcodec1_core"]);
    }

    #[test]
    fn power_off_core2_release_failure_is_returned() {
        let dev = FakeDevice::new(SDM845);
        let cores = sequencer(&dev);
        cores.power_on(&dev, CoreMask::all()).unwrap();
        dev.fail_domain_release("vcodec1", ErrorCode(-13));

        assert_eq!(
            cores.power_off(&dev, CoreMask::all()),
            Err(PmError::DomainRelease {
                resource: Resource::CoreDomain(CoreId::Core2),
                code: ErrorCode(-13),
            })
        );
        assert!(dev.enabled_clocks().is_empty());
    }
}
