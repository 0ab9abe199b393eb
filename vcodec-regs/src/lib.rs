// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Register layout of the video codec wrapper block, and access to it.

#![cfg_attr(not(any(test, feature = "fakes")), no_std)]

#[cfg(any(test, feature = "fakes"))]
pub mod fake;

use bitflags::bitflags;
use core::ptr::NonNull;

/// Offset of the wrapper block from the start of the codec register space.
pub const WRAPPER_BASE: usize = 0x000e_0000;

/// Decoder power control on generation 3 hardware. There is no matching status register.
pub const WRAPPER_VDEC_VCODEC_POWER_CONTROL: usize = WRAPPER_BASE + 0x90;
/// Encoder power control on generation 3 hardware. There is no matching status register.
pub const WRAPPER_VENC_VCODEC_POWER_CONTROL: usize = WRAPPER_BASE + 0xf0;

/// Power status of codec core 0 on generation 4 hardware.
pub const WRAPPER_VCODEC0_MMCC_POWER_STATUS: usize = WRAPPER_BASE + 0x90;
/// Power control of codec core 0 on generation 4 hardware.
pub const WRAPPER_VCODEC0_MMCC_POWER_CONTROL: usize = WRAPPER_BASE + 0x94;
/// Power status of codec core 1 on generation 4 hardware.
pub const WRAPPER_VCODEC1_MMCC_POWER_STATUS: usize = WRAPPER_BASE + 0x110;
/// Power control of codec core 1 on generation 4 hardware.
pub const WRAPPER_VCODEC1_MMCC_POWER_CONTROL: usize = WRAPPER_BASE + 0x114;

bitflags! {
    /// Value written to a `*_POWER_CONTROL` register.
    ///
    /// The register is active low: writing an empty value requests that the codec logic behind it
    /// be powered, writing `OFF` releases it.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct PowerControl: u32 {
        /// Power-off request.
        const OFF = 1 << 0;
    }
}

bitflags! {
    /// Value read from a `*_MMCC_POWER_STATUS` register.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct PowerStatus: u32 {
        /// The codec core is powered.
        const ON = 1 << 1;
    }
}

impl PowerControl {
    /// Returns the control value which asserts (`true`) or releases (`false`) the power request.
    pub const fn request(assert: bool) -> Self {
        if assert { Self::empty() } else { Self::OFF }
    }
}

/// Raw 32-bit access to the codec register space.
///
/// Offsets are in bytes from the start of the register space. Implementations take `&self` for
/// writes because the underlying memory is device memory rather than Rust-owned data.
pub trait RegisterIo {
    /// Reads the 32-bit register at `offset`.
    fn read(&self, offset: usize) -> u32;

    /// Writes `value` to the 32-bit register at `offset`.
    fn write(&self, offset: usize, value: u32);
}

/// Memory-mapped codec registers.
#[derive(Debug)]
pub struct MmioRegisters {
    base: NonNull<u32>,
    size: usize,
}

impl MmioRegisters {
    /// Creates a new accessor for the `size` bytes of register space starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the virtual address of the codec's register space, mapped as device memory
    /// for at least `size` bytes, and must remain mapped for the lifetime of the returned value.
    /// Nothing else may access the wrapper power registers while the returned value exists.
    pub const unsafe fn new(base: NonNull<u32>, size: usize) -> Self {
        Self { base, size }
    }

    fn register(&self, offset: usize) -> *mut u32 {
        assert!(offset % 4 == 0, "Unaligned register offset {offset:#x}");
        assert!(
            offset + 4 <= self.size,
            "Register offset {offset:#x} outside of {:#x} byte window",
            self.size
        );
        self.base.as_ptr().wrapping_byte_add(offset)
    }
}

impl RegisterIo for MmioRegisters {
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `register` checked that the offset is aligned and within the window which the
        // caller of `new` promised is mapped device memory.
        unsafe { self.register(offset).read_volatile() }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: `register` checked that the offset is aligned and within the window which the
        // caller of `new` promised is mapped device memory.
        unsafe { self.register(offset).write_volatile(value) }
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}
