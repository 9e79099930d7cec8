//! Static description of every supported card model.
//!
//! Models differ in how many SJA1000 controllers they carry and in how the
//! controllers' register windows are laid out:
//! - PCI-1680/MIO-2052/PCI-1681 give every channel its own BAR, starting at BAR 2.
//! - PCI-16xx/PCM-37xx (`0xc0xx`, `0xc1xx`) pack all channels into BAR 0,
//!   0x100 bytes apart, one byte per register.
//! - The newer `0xc2xx`/`0xc3xx` revisions also use BAR 0 but place channels
//!   0x400 bytes apart and registers 4 bytes apart.
//!
//! On the `0xcxxx` models the low three bits of the device id are the channel count.
use crate::{PCI_VENDOR_ID_ADV, bus::PciDeviceId};

/// Highest number of channels on one card.
pub const MAX_CHANNELS: usize = 4;

/// How a card model exposes its controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// Number of controllers, `1..=MAX_CHANNELS`.
    pub channel_count: usize,
    /// BAR holding channel 0.
    pub bar: u8,
    /// Channel `i` lives in BAR `bar + i` instead of at `i * channel_stride` in `bar`.
    pub bar_per_channel: bool,
    /// Bytes between two channels sharing a BAR.
    pub channel_stride: usize,
    /// log2 of the bytes between two consecutive registers.
    pub reg_shift: u32,
}

impl Topology {
    /// BAR and byte offset of channel `channel`'s register window.
    pub fn window_of(&self, channel: usize) -> (u8, usize) {
        debug_assert!(channel < self.channel_count);
        if self.bar_per_channel {
            (self.bar + channel as u8, 0)
        } else {
            (self.bar, channel * self.channel_stride)
        }
    }
}

const fn bar_per_channel(channel_count: usize) -> Topology {
    Topology {
        channel_count,
        bar: 2,
        bar_per_channel: true,
        channel_stride: 0,
        reg_shift: 0,
    }
}

const fn legacy_stride(device: u16) -> Topology {
    Topology {
        channel_count: (device & 0x7) as usize,
        bar: 0,
        bar_per_channel: false,
        channel_stride: 0x100,
        reg_shift: 0,
    }
}

const fn wide_stride(device: u16) -> Topology {
    Topology {
        channel_count: (device & 0x7) as usize,
        bar: 0,
        bar_per_channel: false,
        channel_stride: 0x400,
        reg_shift: 2,
    }
}

macro_rules! model {
    ($device: literal, $topology: expr) => {
        (
            PciDeviceId {
                vendor: PCI_VENDOR_ID_ADV,
                device: $device,
            },
            $topology,
        )
    };
}

const TOPOLOGIES: [(PciDeviceId, Topology); 15] = [
    model!(0x1680, bar_per_channel(2)),
    model!(0x2052, bar_per_channel(2)),
    model!(0x1681, bar_per_channel(1)),
    model!(0xc001, legacy_stride(0xc001)),
    model!(0xc002, legacy_stride(0xc002)),
    model!(0xc004, legacy_stride(0xc004)),
    model!(0xc101, legacy_stride(0xc101)),
    model!(0xc102, legacy_stride(0xc102)),
    model!(0xc104, legacy_stride(0xc104)),
    model!(0xc201, wide_stride(0xc201)),
    model!(0xc202, wide_stride(0xc202)),
    model!(0xc204, wide_stride(0xc204)),
    model!(0xc301, wide_stride(0xc301)),
    model!(0xc302, wide_stride(0xc302)),
    model!(0xc304, wide_stride(0xc304)),
];

/// PCI ids this driver binds to, one per [Topology] entry.
pub static ID_TABLE: [PciDeviceId; TOPOLOGIES.len()] = {
    let mut res = [PciDeviceId { vendor: 0, device: 0 }; TOPOLOGIES.len()];
    let mut i = 0;
    while i < TOPOLOGIES.len() {
        res[i] = TOPOLOGIES[i].0;
        i += 1;
    }
    res
};

/// Look up the topology of a card.
///
/// Unknown ids return `None`; there is no default layout.
pub fn lookup(vendor: u16, device: u16) -> Option<Topology> {
    let id = PciDeviceId { vendor, device };
    TOPOLOGIES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, topology)| *topology)
}
