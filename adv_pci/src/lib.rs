//! Socket-CAN style driver for Advantech PCI CAN cards.
//!
//! The cards carry one to four SJA1000 controllers. This crate resolves a card's
//! topology from its PCI ids, maps one register window per controller, resets
//! each controller into PeliCAN mode and hands the configured channels to an
//! external CAN subsystem. Any failure on the way unwinds the whole card.
#![cfg_attr(not(test), no_std)]
extern crate alloc;

#[macro_use]
mod logging;

pub mod bus;
pub mod card;
pub mod channel;
pub mod driver;
pub mod error;
pub mod mmio;
pub mod sja1000;
pub mod topology;
pub mod window;

#[cfg(test)]
mod testing;

/// Driver name, also used as the log target.
pub const DRV_NAME: &str = "adv_pci";

/// PCI vendor id of Advantech.
pub const PCI_VENDOR_ID_ADV: u16 = 0x13fe;

pub use card::CardContext;
pub use driver::AdvPciDriver;
pub use error::{Errno, ProbeError};
