//! Probe and removal of one card.
//!
//! Probing is a linear pipeline: topology lookup, enabling the device, then for
//! every channel in order: map its window, allocate its shell, reset and verify
//! the controller, register it. A channel joins the card only once it is
//! registered, so the number of channels on the card is all that teardown needs
//! to know. Any failure drops the half-built [CardContext], whose destructor
//! runs the teardown, and reports the failure.
//!
//! Teardown walks the channels in reverse order of creation: unregister, free the
//! shell, unmap the window. The device is disabled last.
use crate::{
    bus::PciDevice,
    channel::Sja1000Channel,
    error::{AllocationError, ProbeError},
    mmio::IoWindow,
    sja1000::CanSubsystem,
    topology::{self, Topology},
    window::RegisterWindow,
};
use alloc::vec::Vec;
use utils::handle::Handle;

/// A controller handed to the CAN subsystem, or about to be.
struct ChannelHandle<W: IoWindow, N> {
    channel: Handle<Sja1000Channel<W>>,
    candev: N,
    registered: bool,
}

impl<W: IoWindow, N> ChannelHandle<W, N> {
    fn index(&self) -> usize {
        self.channel.index()
    }

    /// Unregister if needed, free the shell, then unmap the window.
    fn release<S: CanSubsystem<W, Device = N>>(mut self, subsys: &mut S) {
        if self.registered {
            subsys.unregister_device(&mut self.candev);
        }
        subsys.free_device(self.candev);
        drop(self.channel);
    }
}

/// A probed card and its registered channels.
///
/// Dropping the context removes the card.
pub struct CardContext<D: PciDevice, S: CanSubsystem<D::Window>> {
    pdev: D,
    subsys: S,
    topology: Topology,
    channels: Vec<ChannelHandle<D::Window, S::Device>>,
}

impl<D: PciDevice, S: CanSubsystem<D::Window>> CardContext<D, S> {
    /// Probe `pdev` and register each of its channels with `subsys`.
    ///
    /// Either every channel of the card is registered, or the error is returned
    /// with nothing left registered, mapped or enabled.
    pub fn probe(mut pdev: D, subsys: S) -> Result<CardContext<D, S>, ProbeError> {
        let (vendor, device) = (pdev.vendor_id(), pdev.device_id());
        dev_info!(pdev, "Registering card");

        let Some(topology) = topology::lookup(vendor, device) else {
            dev_err!(pdev, "Unsupported model {:04x}:{:04x}", vendor, device);
            return Err(ProbeError::UnsupportedModel { vendor, device });
        };

        if let Err(errno) = pdev.enable() {
            dev_err!(pdev, "Cannot enable card ({})", errno);
            return Err(ProbeError::DeviceEnable(errno));
        }

        dev_info!(pdev, "Detected Advantech PCI card at slot #{}", pdev.slot());
        dev_info!(pdev, "Device ID #{:x}", device);

        let mut channels = Vec::new();
        if channels.try_reserve_exact(topology.channel_count).is_err() {
            dev_err!(pdev, "Unable to allocate memory");
            pdev.disable();
            return Err(ProbeError::Allocation(AllocationError::Card));
        }

        let mut card = CardContext {
            pdev,
            subsys,
            topology,
            channels,
        };
        for index in 0..topology.channel_count {
            card.add_channel(index)?;
        }
        Ok(card)
    }

    /// Bring up channel `index` and append it to the card.
    ///
    /// On failure everything obtained for this channel is released again before
    /// returning; the channels already on the card are left to the caller.
    fn add_channel(&mut self, index: usize) -> Result<(), ProbeError> {
        let (bar, offset) = self.topology.window_of(index);
        let shift = self.topology.reg_shift;
        let len = RegisterWindow::<D::Window>::required_len(offset, shift);

        let Some(io) = self.pdev.iomap(bar, len) else {
            dev_err!(self.pdev, "Unable to map BAR {} for port {}", bar, index);
            return Err(ProbeError::Allocation(AllocationError::RegisterWindow {
                channel: index,
                bar,
            }));
        };
        let regs = RegisterWindow::new(io, offset, shift);
        dev_info!(self.pdev, "Port {} - Base {:#x}", index, regs.base());

        let Some(candev) = self.subsys.alloc_device() else {
            dev_err!(self.pdev, "Unable to allocate device for port {}", index);
            return Err(ProbeError::Allocation(AllocationError::ChannelDevice {
                channel: index,
            }));
        };

        let channel = match Sja1000Channel::initialize(index, regs, self.pdev.irq()) {
            Ok(channel) => channel,
            Err(err) => {
                dev_err!(self.pdev, "Port {} did not leave reset: {}", index, err);
                self.subsys.free_device(candev);
                return Err(ProbeError::reset(index, err));
            }
        };

        let mut handle = ChannelHandle {
            channel: Handle::from(channel),
            candev,
            registered: false,
        };
        let port = handle.channel.create_ref();
        if let Err(errno) = self.subsys.register_device(&mut handle.candev, port) {
            dev_err!(
                self.pdev,
                "Registering device failed (err={})",
                errno.normalized().as_return_code()
            );
            handle.release(&mut self.subsys);
            return Err(ProbeError::Registration {
                channel: index,
                errno,
            });
        }
        handle.registered = true;
        dev_dbg!(self.pdev, "Port {} registered", index);

        // capacity was reserved for every channel during probe
        self.channels.push(handle);
        Ok(())
    }

    /// Remove the card: the same as dropping it.
    pub fn remove(self) {}

    fn teardown(&mut self) {
        dev_info!(self.pdev, "Removing card");
        while let Some(handle) = self.channels.pop() {
            dev_info!(self.pdev, "Removing port {}", handle.index());
            if handle.channel.pinned_count() > 0 {
                dev_warn!(
                    self.pdev,
                    "Port {} still in use, window stays mapped until released",
                    handle.index()
                );
            }
            handle.release(&mut self.subsys);
        }
        self.pdev.disable();
    }

    /// Layout the card was probed with.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn device(&self) -> &D {
        &self.pdev
    }

    /// Number of channels brought up so far.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> impl Iterator<Item = &Sja1000Channel<D::Window>> + '_ {
        self.channels.iter().map(|handle| &*handle.channel)
    }
}

impl<D: PciDevice, S: CanSubsystem<D::Window>> Drop for CardContext<D, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
