//! The `adv_pci` driver as seen by the host's PCI layer.
use crate::{
    DRV_NAME,
    bus::{PciDevice, PciDeviceId, PciDriver},
    card::CardContext,
    error::ProbeError,
    sja1000::CanSubsystem,
    topology::ID_TABLE,
};
use core::marker::PhantomData;

/// Binds Advantech CAN cards and registers their channels with one CAN subsystem.
///
/// `S` is a handle to the subsystem; every bound card keeps its own clone.
pub struct AdvPciDriver<D, S> {
    subsys: S,
    _device: PhantomData<fn(D)>,
}

impl<D: PciDevice, S: CanSubsystem<D::Window> + Clone> AdvPciDriver<D, S> {
    pub fn new(subsys: S) -> AdvPciDriver<D, S> {
        AdvPciDriver {
            subsys,
            _device: PhantomData,
        }
    }
}

impl<D: PciDevice, S: CanSubsystem<D::Window> + Clone> PciDriver for AdvPciDriver<D, S> {
    type Device = D;
    type Bound = CardContext<D, S>;

    fn get_name(&self) -> &'static str {
        DRV_NAME
    }

    fn get_id_table(&self) -> &'static [PciDeviceId] {
        &ID_TABLE
    }

    fn probe(&self, pdev: D) -> Result<CardContext<D, S>, ProbeError> {
        CardContext::probe(pdev, self.subsys.clone())
    }

    fn remove(&self, card: CardContext<D, S>) {
        card.remove();
    }
}
