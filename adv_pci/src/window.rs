//! Register window of one controller.
use crate::{mmio::IoWindow, sja1000::REGISTER_COUNT};

/// The registers of one controller inside a mapped BAR.
///
/// Register `index` lives at byte `offset + (index << shift)` of the mapping.
/// The window owns the mapping, so no register can be reached after the
/// window is dropped.
#[derive(Debug)]
pub struct RegisterWindow<W: IoWindow> {
    io: W,
    offset: usize,
    shift: u32,
}

impl<W: IoWindow> RegisterWindow<W> {
    /// Bytes a mapping needs to hold a controller at `offset` with registers
    /// `1 << shift` bytes apart.
    pub const fn required_len(offset: usize, shift: u32) -> usize {
        offset + (REGISTER_COUNT << shift)
    }

    pub fn new(io: W, offset: usize, shift: u32) -> RegisterWindow<W> {
        debug_assert!(Self::required_len(offset, shift) <= io.len());
        RegisterWindow { io, offset, shift }
    }

    /// Address of register 0.
    pub fn base(&self) -> usize {
        self.io.base() + self.offset
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline(always)]
    fn offset_of(&self, index: u8) -> usize {
        debug_assert!((index as usize) < REGISTER_COUNT);
        self.offset + ((index as usize) << self.shift)
    }

    /// Bus address of register `index`.
    pub fn address_of(&self, index: u8) -> usize {
        self.io.base() + self.offset_of(index)
    }

    pub fn read(&self, index: u8) -> u8 {
        self.io.read8(self.offset_of(index))
    }

    pub fn write(&self, index: u8, value: u8) {
        self.io.write8(self.offset_of(index), value)
    }
}
