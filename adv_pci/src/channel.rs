//! One SJA1000 controller on an Advantech card.
use crate::{
    error::ResetError,
    mmio::IoWindow,
    sja1000::{ClockDivider, ControllerConfig, IrqFlags, Mode, OutputControl, Reg},
    window::RegisterWindow,
};

/// Controller clock: half of the 16 MHz oscillator.
pub const ADV_PCI_CAN_CLOCK: u32 = 16_000_000 / 2;

/// Output control of the board's transceiver wiring.
pub fn adv_pci_ocr() -> OutputControl {
    OutputControl::TX0_PUSHPULL | OutputControl::TX1_PUSHPULL | OutputControl::TX1_INVERT
}

/// Clock divider: PeliCAN layout with CBP set, as required by the boards.
pub fn adv_pci_cdr() -> ClockDivider {
    ClockDivider::PELICAN | ClockDivider::CBP
}

/// A verified controller, ready to be handed to the CAN subsystem.
#[derive(Debug)]
pub struct Sja1000Channel<W: IoWindow> {
    index: usize,
    regs: RegisterWindow<W>,
    config: ControllerConfig,
}

impl<W: IoWindow> Sja1000Channel<W> {
    /// Reset the controller behind `regs` and verify that it answers.
    ///
    /// On failure the window is dropped together with the error path, so an
    /// unverified controller can never be registered.
    pub fn initialize(
        index: usize,
        regs: RegisterWindow<W>,
        irq: u32,
    ) -> Result<Sja1000Channel<W>, ResetError> {
        reset(&regs)?;
        Ok(Sja1000Channel {
            index,
            regs,
            config: ControllerConfig {
                clock_hz: ADV_PCI_CAN_CLOCK,
                ocr: adv_pci_ocr().bits(),
                cdr: adv_pci_cdr().bits(),
                irq,
                irq_flags: IrqFlags::SHARED,
                dev_id: index,
            },
        })
    }

    /// Position of the controller on its card.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Address of register 0, for diagnostics.
    pub fn base(&self) -> usize {
        self.regs.base()
    }

    pub fn read_reg(&self, reg: Reg) -> u8 {
        self.regs.read(reg.into())
    }

    pub fn write_reg(&self, reg: Reg, value: u8) {
        self.regs.write(reg.into(), value)
    }

    /// Access by raw index, for the acceptance filter and frame buffer
    /// registers that alias each other.
    pub fn read(&self, index: u8) -> u8 {
        self.regs.read(index)
    }

    pub fn write(&self, index: u8, value: u8) {
        self.regs.write(index, value)
    }
}

/// Put the controller into reset mode and select the PeliCAN layout.
fn reset<W: IoWindow>(regs: &RegisterWindow<W>) -> Result<(), ResetError> {
    let cdr = adv_pci_cdr().bits();
    regs.write(Reg::Mode.into(), Mode::RESET.bits());
    regs.write(Reg::ClockDivider.into(), cdr);
    let read = regs.read(Reg::ClockDivider.into());
    if read != cdr {
        return Err(ResetError {
            expected: cdr,
            read,
        });
    }
    Ok(())
}
