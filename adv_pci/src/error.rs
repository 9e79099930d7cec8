//! Error types reported by the probe path.
//!
//! The bus layer only understands a signed return code, so every error maps to
//! an [Errno] through [ProbeError::errno].
use core::fmt::{Display, Formatter};

/// Positive errno value as used by the host kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Errno(pub i32);

impl Errno {
    /// I/O error.
    pub const EIO: Errno = Errno(5);
    /// Out of memory.
    pub const ENOMEM: Errno = Errno(12);
    /// No such device.
    pub const ENODEV: Errno = Errno(19);

    /// Value to return from a probe or remove callback.
    pub const fn as_return_code(self) -> i32 {
        -self.0
    }

    /// The same error as a positive value.
    ///
    /// Subsystems may hand back kernel-style negative codes; zero carries no
    /// error at all and is reported as [Errno::EIO].
    pub const fn normalized(self) -> Errno {
        match self.0 {
            0 | i32::MIN => Errno::EIO,
            n if n < 0 => Errno(-n),
            _ => self,
        }
    }
}

impl Display for Errno {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "errno {}", self.0)
    }
}

// region: Error Types

/// Errors that may be returned when probing a card.
///
/// Every variant is reported only after the card has been unwound to the state
/// it had before the probe started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// The bus refused to enable the device. Nothing was allocated.
    DeviceEnable(Errno),
    /// The ids do not name a card with a known topology. The device was not touched.
    UnsupportedModel { vendor: u16, device: u16 },
    /// A resource of the card or of one channel could not be obtained.
    Allocation(AllocationError),
    /// A controller did not keep the clock divider value written during reset.
    ResetVerification { channel: usize, expected: u8, read: u8 },
    /// The CAN subsystem rejected a channel.
    Registration { channel: usize, errno: Errno },
}

/// Resource that could not be obtained during a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// Per-card channel storage.
    Card,
    /// Mapping of a channel's register window.
    RegisterWindow { channel: usize, bar: u8 },
    /// Channel device shell of the CAN subsystem.
    ChannelDevice { channel: usize },
}

/// The clock divider register did not read back what was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetError {
    pub expected: u8,
    pub read: u8,
}

// endregion

impl ProbeError {
    /// Errno reported to the bus layer.
    pub fn errno(&self) -> Errno {
        match self {
            ProbeError::DeviceEnable(_) | ProbeError::UnsupportedModel { .. } => Errno::ENODEV,
            ProbeError::Allocation(_) => Errno::ENOMEM,
            ProbeError::ResetVerification { .. } => Errno::EIO,
            ProbeError::Registration { errno, .. } => errno.normalized(),
        }
    }

    pub(crate) fn reset(channel: usize, err: ResetError) -> ProbeError {
        ProbeError::ResetVerification {
            channel,
            expected: err.expected,
            read: err.read,
        }
    }
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ProbeError::DeviceEnable(errno) => write!(f, "cannot enable card ({})", errno),
            ProbeError::UnsupportedModel { vendor, device } => {
                write!(f, "unsupported model {:04x}:{:04x}", vendor, device)
            }
            ProbeError::Allocation(AllocationError::Card) => {
                write!(f, "unable to allocate card structures")
            }
            ProbeError::Allocation(AllocationError::RegisterWindow { channel, bar }) => {
                write!(f, "unable to map BAR {} for channel {}", bar, channel)
            }
            ProbeError::Allocation(AllocationError::ChannelDevice { channel }) => {
                write!(f, "unable to allocate device for channel {}", channel)
            }
            ProbeError::ResetVerification {
                channel,
                expected,
                read,
            } => write!(
                f,
                "channel {} failed reset: CDR read {:#04x}, expected {:#04x}",
                channel, read, expected
            ),
            ProbeError::Registration { channel, errno } => {
                write!(f, "registering channel {} failed ({})", channel, errno)
            }
        }
    }
}

impl Display for ResetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "CDR read {:#04x}, expected {:#04x}", self.read, self.expected)
    }
}
