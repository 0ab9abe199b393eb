// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The set of clocks shared by the whole codec subsystem.

use crate::{
    error::{ErrorCode, PmError, Resource},
    platform::{Clock, VcodecDevice},
};
use arrayvec::ArrayVec;
use log::debug;

/// The maximum number of shared clocks a device may list.
pub const MAX_CLOCKS: usize = 8;

/// An ordered group of clocks which are enabled and disabled together.
///
/// Clocks are enabled in the order of the device's clock table and disabled in reverse.
#[derive(Debug)]
pub struct ClockSet<C: Clock> {
    clocks: ArrayVec<C, MAX_CLOCKS>,
}

impl<C: Clock> ClockSet<C> {
    /// Resolves every clock named in the device's clock table.
    ///
    /// Stops at the first clock which cannot be resolved, without enabling anything.
    pub fn acquire<D: VcodecDevice<Clock = C>>(dev: &D) -> Result<Self, PmError> {
        let mut clocks = ArrayVec::new();
        for (index, &name) in dev.resources().clocks.iter().enumerate() {
            let clock = dev
                .clk_get(name)
                .map_err(|code| PmError::ResourceUnavailable {
                    resource: Resource::SharedClock(index),
                    code,
                })?;
            clocks
                .try_push(clock)
                .map_err(|_| PmError::ResourceUnavailable {
                    resource: Resource::SharedClock(index),
                    code: ErrorCode::EINVAL,
                })?;
        }
        debug!("Acquired {} shared clocks", clocks.len());
        Ok(Self { clocks })
    }

    /// Returns the number of clocks in the set.
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// Enables every clock in order.
    ///
    /// If a clock fails to enable, the clocks before it are disabled again in reverse order before
    /// the error is returned, so either all clocks end up enabled or none do.
    pub fn enable_all(&self) -> Result<(), PmError> {
        for (index, clock) in self.clocks.iter().enumerate() {
            if let Err(code) = clock.enable() {
                for enabled in self.clocks[..index].iter().rev() {
                    enabled.disable();
                }
                return Err(PmError::ClockEnable {
                    resource: Resource::SharedClock(index),
                    code,
                });
            }
        }
        Ok(())
    }

    /// Disables every clock in reverse order.
    pub fn disable_all(&self) {
        for clock in self.clocks.iter().rev() {
            clock.disable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        platform::{
            MSM8916, MSM8996, Resources,
            test::{Event, FakeDevice},
        },
        strategy::HfiVersion,
    };

    #[test]
    fn acquire_resolves_in_table_order() {
        let dev = FakeDevice::new(MSM8996);
        let clocks = ClockSet::acquire(&dev).unwrap();

        assert_eq!(clocks.len(), 4);
        assert!(!clocks.is_empty());
        assert_eq!(
            dev.events(),
            [
                Event::ClkGet("core"),
                Event::ClkGet("iface"),
                Event::ClkGet("bus"),
                Event::ClkGet("mbus"),
            ]
        );
    }

    #[test]
    fn acquire_reports_failing_index() {
        let dev = FakeDevice::new(MSM8996);
        dev.fail_clk_get("bus", ErrorCode(-517));

        assert_eq!(
            ClockSet::acquire(&dev).unwrap_err(),
            PmError::ResourceUnavailable {
                resource: Resource::SharedClock(2),
                code: ErrorCode(-517),
            }
        );
        // Nothing after the failing clock is resolved and nothing is enabled.
        assert_eq!(
            dev.events(),
            [
                Event::ClkGet("core"),
                Event::ClkGet("iface"),
                Event::ClkGet("bus"),
            ]
        );
    }

    #[test]
    fn acquire_rejects_oversized_table() {
        let dev = FakeDevice::new(Resources {
            clocks: &["c0", "c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8"],
            hfi_version: HfiVersion::V1xx,
        });

        assert_eq!(
            ClockSet::acquire(&dev).unwrap_err(),
            PmError::ResourceUnavailable {
                resource: Resource::SharedClock(MAX_CLOCKS),
                code: ErrorCode::EINVAL,
            }
        );
    }

    #[test]
    fn empty_table() {
        let dev = FakeDevice::new(Resources {
            clocks: &[],
            hfi_version: HfiVersion::V1xx,
        });
        let clocks = ClockSet::acquire(&dev).unwrap();

        assert!(clocks.is_empty());
        clocks.enable_all().unwrap();
        clocks.disable_all();
        assert!(dev.events().is_empty());
    }

    #[test]
    fn enable_and_disable_order() {
        let dev = FakeDevice::new(MSM8916);
        let clocks = ClockSet::acquire(&dev).unwrap();
        dev.clear_events();

        clocks.enable_all().unwrap();
        assert_eq!(dev.enabled_clocks(), ["bus", "core", "iface"]);
        clocks.disable_all();
        assert!(dev.enabled_clocks().is_empty());

        assert_eq!(
            dev.events(),
            [
                Event::ClkEnable("core"),
                Event::ClkEnable("iface"),
                Event::ClkEnable("bus"),
                Event::ClkDisable("bus"),
                Event::ClkDisable("iface"),
                Event::ClkDisable("core"),
            ]
        );
    }

    #[test]
    fn enable_failure_rolls_back_in_reverse() {
        const NAMES: &[&str] = &["a", "b", "c", "d", "e"];
        for failing in 0..NAMES.len() {
            let dev = FakeDevice::new(Resources {
                clocks: NAMES,
                hfi_version: HfiVersion::V1xx,
            });
            let clocks = ClockSet::acquire(&dev).unwrap();
            dev.clear_events();
            dev.fail_clk_enable(NAMES[failing], ErrorCode(-5));

            assert_eq!(
                clocks.enable_all().unwrap_err(),
                PmError::ClockEnable {
                    resource: Resource::SharedClock(failing),
                    code: ErrorCode(-5),
                }
            );
            assert!(dev.enabled_clocks().is_empty());

            let mut expected = Vec::new();
            expected.extend(NAMES[..=failing].iter().map(|&name| Event::ClkEnable(name)));
            expected.extend(NAMES[..failing].iter().rev().map(|&name| Event::ClkDisable(name)));
            assert_eq!(dev.events(), expected);
        }
    }
}
