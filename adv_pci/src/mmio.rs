//! Byte-wide access to mapped I/O memory.
use core::{
    cell::UnsafeCell,
    ptr::{NonNull, read_volatile, write_volatile},
};

/// A mapped range of device memory.
///
/// Every call is one synchronous bus access; accesses are never merged or
/// reordered relative to the caller's sequence. Implementations owning a
/// mapping release it when dropped.
pub trait IoWindow {
    /// Virtual address of the first byte of the window.
    fn base(&self) -> usize;
    /// Size of the window in bytes.
    fn len(&self) -> usize;
    fn read8(&self, offset: usize) -> u8;
    fn write8(&self, offset: usize, value: u8);
}

#[repr(transparent)]
pub struct Register<T: Sized + Copy> {
    inner: UnsafeCell<T>,
}

impl<T: Sized + Copy> Register<T> {
    #[inline(always)]
    pub fn read(&self) -> T {
        unsafe { read_volatile(self.inner.get()) }
    }
    #[inline(always)]
    pub fn write(&self, value: T) {
        unsafe {
            write_volatile(self.inner.get(), value);
        }
    }
}

/// [IoWindow] over a range that somebody else has mapped.
///
/// The window does not own the mapping; the host's window type wraps it and
/// unmaps on drop.
#[derive(Debug)]
pub struct MmioWindow {
    base: NonNull<u8>,
    len: usize,
}

impl MmioWindow {
    /// # Safety
    /// `base..base + len` must be mapped device (or ordinary) memory that stays
    /// valid for volatile byte access for the lifetime of the returned value.
    pub unsafe fn new(base: NonNull<u8>, len: usize) -> MmioWindow {
        MmioWindow { base, len }
    }

    #[inline(always)]
    fn register(&self, offset: usize) -> &Register<u8> {
        assert!(
            offset < self.len,
            "MMIO offset {:#x} outside window of {:#x} bytes",
            offset,
            self.len
        );
        unsafe { &*(self.base.as_ptr().add(offset) as *const Register<u8>) }
    }
}

impl IoWindow for MmioWindow {
    fn base(&self) -> usize {
        self.base.as_ptr() as usize
    }

    fn len(&self) -> usize {
        self.len
    }

    fn read8(&self, offset: usize) -> u8 {
        self.register(offset).read()
    }

    fn write8(&self, offset: usize, value: u8) {
        self.register(offset).write(value)
    }
}
