//! Journaling fakes of the host collaborators.
use crate::{
    bus::PciDevice,
    channel::Sja1000Channel,
    error::Errno,
    mmio::IoWindow,
    sja1000::CanSubsystem,
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use utils::handle::HandleRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Enable,
    Disable,
    Map { bar: u8, len: usize },
    Unmap { bar: u8 },
    Write { bar: u8, offset: usize, value: u8 },
    Alloc { dev: usize },
    Register { dev: usize, channel: usize },
    Unregister { dev: usize, channel: usize },
    Free { dev: usize },
}

/// Ordered record of everything the fakes observed.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Lifecycle events only, register writes left out.
    pub fn lifecycle(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, Event::Write { .. }))
            .collect()
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.0.borrow().contains(event)
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(*e)).count()
    }

    /// `(bar, offset, value)` of every register write.
    pub fn writes(&self) -> Vec<(u8, usize, u8)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write { bar, offset, value } => Some((*bar, *offset, *value)),
                _ => None,
            })
            .collect()
    }

    /// Windows mapped and not yet unmapped.
    pub fn mapped(&self) -> usize {
        self.count(|e| matches!(e, Event::Map { .. }))
            - self.count(|e| matches!(e, Event::Unmap { .. }))
    }

    /// Channels registered and not yet unregistered.
    pub fn registered(&self) -> usize {
        self.count(|e| matches!(e, Event::Register { .. }))
            - self.count(|e| matches!(e, Event::Unregister { .. }))
    }

    /// Channel shells allocated and not yet freed.
    pub fn allocated(&self) -> usize {
        self.count(|e| matches!(e, Event::Alloc { .. }))
            - self.count(|e| matches!(e, Event::Free { .. }))
    }

    pub fn enabled(&self) -> bool {
        self.count(|e| *e == Event::Enable) > self.count(|e| *e == Event::Disable)
    }
}

/// Heap backed BAR mapping. A dead window reads `0xff` everywhere, like a bus
/// with nothing behind it.
#[derive(Debug)]
pub struct FakeWindow {
    journal: Journal,
    bar: u8,
    base: usize,
    mem: RefCell<Vec<u8>>,
    dead: bool,
}

impl FakeWindow {
    pub fn new(journal: &Journal, bar: u8, base: usize, len: usize, dead: bool) -> FakeWindow {
        FakeWindow {
            journal: journal.clone(),
            bar,
            base,
            mem: RefCell::new(vec![0; len]),
            dead,
        }
    }
}

impl IoWindow for FakeWindow {
    fn base(&self) -> usize {
        self.base
    }

    fn len(&self) -> usize {
        self.mem.borrow().len()
    }

    fn read8(&self, offset: usize) -> u8 {
        let value = self.mem.borrow()[offset];
        if self.dead { 0xff } else { value }
    }

    fn write8(&self, offset: usize, value: u8) {
        self.journal.push(Event::Write {
            bar: self.bar,
            offset,
            value,
        });
        self.mem.borrow_mut()[offset] = value;
    }
}

impl Drop for FakeWindow {
    fn drop(&mut self) {
        self.journal.push(Event::Unmap { bar: self.bar });
    }
}

/// Claimed PCI device with fault injection.
#[derive(Debug)]
pub struct FakePci {
    pub journal: Journal,
    pub vendor: u16,
    pub device: u16,
    pub irq: u32,
    /// Error returned by `enable`.
    pub enable_error: Option<Errno>,
    /// The n-th `iomap` call (0-based) fails.
    pub map_fail_at: Option<usize>,
    /// Windows returned by these `iomap` calls have no hardware behind them.
    pub dead_maps: Vec<usize>,
    maps: Cell<usize>,
}

impl FakePci {
    pub fn new(journal: &Journal, device: u16) -> FakePci {
        FakePci {
            journal: journal.clone(),
            vendor: crate::PCI_VENDOR_ID_ADV,
            device,
            irq: 17,
            enable_error: None,
            map_fail_at: None,
            dead_maps: vec![],
            maps: Cell::new(0),
        }
    }
}

impl PciDevice for FakePci {
    type Window = FakeWindow;

    fn vendor_id(&self) -> u16 {
        self.vendor
    }

    fn device_id(&self) -> u16 {
        self.device
    }

    fn irq(&self) -> u32 {
        self.irq
    }

    fn slot(&self) -> u8 {
        3
    }

    fn name(&self) -> &str {
        "0000:03:00.0"
    }

    fn enable(&mut self) -> Result<(), Errno> {
        if let Some(errno) = self.enable_error {
            return Err(errno);
        }
        self.journal.push(Event::Enable);
        Ok(())
    }

    fn disable(&mut self) {
        self.journal.push(Event::Disable);
    }

    fn iomap(&self, bar: u8, len: usize) -> Option<FakeWindow> {
        let n = self.maps.get();
        self.maps.set(n + 1);
        if self.map_fail_at == Some(n) {
            return None;
        }
        self.journal.push(Event::Map { bar, len });
        let base = 0x1000_0000 * (bar as usize + 1);
        Some(FakeWindow::new(
            &self.journal,
            bar,
            base,
            len,
            self.dead_maps.contains(&n),
        ))
    }
}

#[derive(Debug)]
pub struct FakeCanDev {
    pub id: usize,
    channel: Option<usize>,
}

/// CAN subsystem with fault injection. Clones share their state.
#[derive(Debug, Clone, Default)]
pub struct FakeCan {
    pub journal: Journal,
    /// The n-th `alloc_device` call (0-based) fails.
    pub alloc_fail_at: Option<usize>,
    /// Registering the shell from the n-th allocation fails.
    pub register_fail_at: Option<usize>,
    /// Errno of a failing registration, `Errno(16)` if unset.
    pub register_error: Option<Errno>,
    allocs: Rc<Cell<usize>>,
    ports: Rc<RefCell<Vec<HandleRef<Sja1000Channel<FakeWindow>>>>>,
}

impl FakeCan {
    pub fn new(journal: &Journal) -> FakeCan {
        FakeCan {
            journal: journal.clone(),
            ..Default::default()
        }
    }

    /// Ports handed over by successful registrations.
    pub fn ports(&self) -> Vec<HandleRef<Sja1000Channel<FakeWindow>>> {
        self.ports.borrow().clone()
    }
}

impl CanSubsystem<FakeWindow> for FakeCan {
    type Device = FakeCanDev;

    fn alloc_device(&mut self) -> Option<FakeCanDev> {
        let id = self.allocs.get();
        self.allocs.set(id + 1);
        if self.alloc_fail_at == Some(id) {
            return None;
        }
        self.journal.push(Event::Alloc { dev: id });
        Some(FakeCanDev { id, channel: None })
    }

    fn register_device(
        &mut self,
        dev: &mut FakeCanDev,
        port: HandleRef<Sja1000Channel<FakeWindow>>,
    ) -> Result<(), Errno> {
        if self.register_fail_at == Some(dev.id) {
            return Err(self.register_error.unwrap_or(Errno(16)));
        }
        let channel = port.get_handle().map(|chan| chan.index()).ok_or(Errno::ENODEV)?;
        dev.channel = Some(channel);
        self.journal.push(Event::Register {
            dev: dev.id,
            channel,
        });
        self.ports.borrow_mut().push(port);
        Ok(())
    }

    fn unregister_device(&mut self, dev: &mut FakeCanDev) {
        let channel = dev.channel.take().expect("unregistering a device never registered");
        self.journal.push(Event::Unregister {
            dev: dev.id,
            channel,
        });
    }

    fn free_device(&mut self, dev: FakeCanDev) {
        self.journal.push(Event::Free { dev: dev.id });
    }
}
