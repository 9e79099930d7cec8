//! Contract with the generic SJA1000 protocol engine.
//!
//! The engine (bit timing, mode handling, interrupt-driven TX/RX) lives outside
//! this crate. It receives every channel through [CanSubsystem] and reaches the
//! controller registers only through [Sja1000Channel::read_reg] and
//! [Sja1000Channel::write_reg].
use crate::{channel::Sja1000Channel, error::Errno, mmio::IoWindow};
use bitflags::bitflags;
use utils::handle::HandleRef;

pub mod regs;

pub use regs::{ClockDivider, Mode, OutputControl, REGISTER_COUNT, Reg};

bitflags! {
    /// How the engine must request the channel's interrupt line.
    pub struct IrqFlags: u32 {
        /// The line is shared with the other channels of the card.
        const SHARED = 0x80;
    }
}

/// Values the engine applies when it configures a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Controller clock in Hz.
    pub clock_hz: u32,
    /// Output control byte.
    pub ocr: u8,
    /// Clock divider byte.
    pub cdr: u8,
    pub irq: u32,
    pub irq_flags: IrqFlags,
    /// Channel index on the card, exposed as the device instance id.
    pub dev_id: usize,
}

/// The CAN subsystem that channels are registered with.
///
/// A channel lives in a subsystem-provided shell ([CanSubsystem::Device]).
/// Probing allocates the shell, registers it once the controller is verified,
/// and on removal unregisters it (only if registration succeeded) before
/// freeing it. Unregistering cannot fail.
pub trait CanSubsystem<W: IoWindow> {
    type Device;

    /// Allocate a channel shell, `None` when out of resources.
    fn alloc_device(&mut self) -> Option<Self::Device>;

    /// Register a verified channel.
    ///
    /// `port` stays upgradable until the card drops the channel; the engine must
    /// not hold the upgraded value longer than one register sequence.
    fn register_device(
        &mut self,
        dev: &mut Self::Device,
        port: HandleRef<Sja1000Channel<W>>,
    ) -> Result<(), Errno>;

    fn unregister_device(&mut self, dev: &mut Self::Device);

    fn free_device(&mut self, dev: Self::Device);
}
