// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fourth generation: the shared clocks, then two codec cores each with its own clocks, power
//! domain and power handshake. The shared power domain is tied to the device's runtime power state
//! with a device link.

use super::PowerState;
use crate::{
    clocks::ClockSet,
    cores::{CoreId, CoreMask, CoreResources, CoreSequencer, get_core_clocks},
    error::{PmError, Resource},
    link::{DeviceLinkFlags, PowerDomainLink},
    platform::VcodecDevice,
};
use log::{debug, error};

/// Name of the power domain shared by the whole subsystem.
const SHARED_DOMAIN: &str = "venus";

#[derive(Debug)]
pub(super) struct V4Pm<D: VcodecDevice> {
    clocks: ClockSet<D::Clock>,
    cores: CoreSequencer<D>,
    shared_domain: D::PowerDomain,
    link: PowerDomainLink<D::DeviceLink>,
}

fn attach<D: VcodecDevice>(
    dev: &D,
    name: &'static str,
    resource: Resource,
) -> Result<D::PowerDomain, PmError> {
    let domain = dev
        .pm_domain_attach_by_name(name)
        .map_err(|code| PmError::ResourceUnavailable { resource, code })?;
    debug!("Attached power domain {name}");
    Ok(domain)
}

impl<D: VcodecDevice> V4Pm<D> {
    /// Resolves all clocks, then attaches the power domains and links the shared one.
    ///
    /// If a domain fails to attach or the link cannot be created, the domains attached so far are
    /// detached again in attach order.
    pub(super) fn get(dev: &D) -> Result<Self, PmError> {
        let clocks = ClockSet::acquire(dev)?;
        let (core1_clock, core1_bus_clock) = get_core_clocks(dev, CoreId::Core1)?;
        let (core2_clock, core2_bus_clock) = get_core_clocks(dev, CoreId::Core2)?;

        let shared_domain = attach(dev, SHARED_DOMAIN, Resource::SharedDomain)?;
        let core1_domain = match attach(
            dev,
            CoreId::Core1.domain_name(),
            Resource::CoreDomain(CoreId::Core1),
        ) {
            Ok(domain) => domain,
            Err(e) => {
                dev.pm_domain_detach(shared_domain);
                return Err(e);
            }
        };
        let core2_domain = match attach(
            dev,
            CoreId::Core2.domain_name(),
            Resource::CoreDomain(CoreId::Core2),
        ) {
            Ok(domain) => domain,
            Err(e) => {
                dev.pm_domain_detach(shared_domain);
                dev.pm_domain_detach(core1_domain);
                return Err(e);
            }
        };

        let link = match PowerDomainLink::establish(
            dev,
            &shared_domain,
            DeviceLinkFlags::SHARED_DOMAIN,
        ) {
            Ok(link) => link,
            Err(e) => {
                dev.pm_domain_detach(shared_domain);
                dev.pm_domain_detach(core1_domain);
                dev.pm_domain_detach(core2_domain);
                return Err(e);
            }
        };

        Ok(Self {
            clocks,
            cores: CoreSequencer::new(
                CoreResources::new(core1_clock, core1_bus_clock, core1_domain),
                CoreResources::new(core2_clock, core2_bus_clock, core2_domain),
            ),
            shared_domain,
            link,
        })
    }

    /// Removes the link, then detaches the shared domain and the core domains in core order.
    pub(super) fn put(self, dev: &D) {
        self.link.teardown(dev);
        dev.pm_domain_detach(self.shared_domain);
        for domain in self.cores.into_domains() {
            dev.pm_domain_detach(domain);
        }
    }

    pub(super) fn power(&self, dev: &D, state: PowerState) -> Result<(), PmError> {
        match state {
            PowerState::On => {
                if let Err(e) = self.clocks.enable_all() {
                    error!("Core clocks enable failed: {e}");
                    return Err(e);
                }
                self.cores.power_on(dev, CoreMask::all())
            }
            PowerState::Off => {
                let result = self.cores.power_off(dev, CoreMask::all());
                if let Err(e) = result {
                    error!("Power off by core failed: {e}");
                }
                self.clocks.disable_all();
                result
            }
        }
    }
}
