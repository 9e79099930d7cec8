//! Interfaces of the host's PCI layer.
//!
//! The host scans the bus, filters devices against [PciDriver::get_id_table], claims
//! a match and hands the claimed device to [PciDriver::probe]. The value probe
//! returns is handed back to [PciDriver::remove] when the device goes away.
//! The host serializes probe and remove of one device.
use crate::{
    error::{Errno, ProbeError},
    mmio::IoWindow,
};

/// Vendor and device id of a PCI function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciDeviceId {
    pub vendor: u16,
    pub device: u16,
}

/// A claimed PCI device.
pub trait PciDevice {
    /// Mapping of a BAR; unmapped when dropped.
    type Window: IoWindow;

    fn vendor_id(&self) -> u16;
    fn device_id(&self) -> u16;
    /// Interrupt line assigned to the device.
    fn irq(&self) -> u32;
    /// Slot number on the bus.
    fn slot(&self) -> u8;
    /// Bus address, used to prefix log records.
    fn name(&self) -> &str;

    fn enable(&mut self) -> Result<(), Errno>;
    fn disable(&mut self);

    /// Map the first `len` bytes of `bar`, `None` if the BAR cannot be mapped.
    fn iomap(&self, bar: u8, len: usize) -> Option<Self::Window>;
}

/// Callbacks a PCI driver offers to the host.
pub trait PciDriver {
    type Device: PciDevice;
    /// Per-device state kept by the host between probe and remove.
    type Bound;

    fn get_name(&self) -> &'static str;
    fn get_id_table(&self) -> &'static [PciDeviceId];
    fn probe(&self, pdev: Self::Device) -> Result<Self::Bound, ProbeError>;
    fn remove(&self, bound: Self::Bound);

    /// Whether the host should offer a device with these ids to [PciDriver::probe].
    fn matches(&self, vendor: u16, device: u16) -> bool {
        self.get_id_table()
            .iter()
            .any(|id| id.vendor == vendor && id.device == device)
    }
}
