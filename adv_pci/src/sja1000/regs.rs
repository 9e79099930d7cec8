//! SJA1000 register map in PeliCAN mode.
//!
//! Indices are pre-shift: the card decides how far apart two consecutive
//! registers are on the bus.
use bitflags::bitflags;
use num_enum::IntoPrimitive;

/// Number of register indices the controller decodes.
pub const REGISTER_COUNT: usize = 0x20;

/// Operating mode registers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
pub enum Reg {
    /// MOD(RW)     :0x00
    Mode = 0x00,
    /// CMR(W)      :0x01
    Command = 0x01,
    /// SR(R)       :0x02
    Status = 0x02,
    /// IR(R)       :0x03
    Interrupt = 0x03,
    /// IER(RW)     :0x04
    InterruptEnable = 0x04,
    /// BTR0(RW)    :0x06, writable in reset mode only
    BusTiming0 = 0x06,
    /// BTR1(RW)    :0x07, writable in reset mode only
    BusTiming1 = 0x07,
    /// OCR(RW)     :0x08, writable in reset mode only
    OutputControl = 0x08,
    /// ALC(R)      :0x0b
    ArbitrationLost = 0x0b,
    /// ECC(R)      :0x0c
    ErrorCode = 0x0c,
    /// EWLR(RW)    :0x0d
    ErrorWarningLimit = 0x0d,
    /// RXERR(RW)   :0x0e
    RxErrorCounter = 0x0e,
    /// TXERR(RW)   :0x0f
    TxErrorCounter = 0x0f,
    /// Frame information of the TX/RX buffer :0x10
    FrameInfo = 0x10,
    /// RMC(R)      :0x1d
    RxMessageCounter = 0x1d,
    /// RBSA(RW)    :0x1e
    RxBufferStart = 0x1e,
    /// CDR(RW)     :0x1f
    ClockDivider = 0x1f,
}

/// First acceptance code register; aliases the frame buffer in reset mode.
pub const ACCEPTANCE_CODE: u8 = 0x10;
/// First acceptance mask register.
pub const ACCEPTANCE_MASK: u8 = 0x14;
/// First identifier byte of the TX/RX buffer.
pub const FRAME_ID: u8 = 0x11;

bitflags! {
    /// MOD register bits.
    pub struct Mode: u8 {
        /// Reset mode; the controller stops and accepts configuration.
        const RESET         = 0x01;
        const LISTEN_ONLY   = 0x02;
        const SELF_TEST     = 0x04;
        /// Single acceptance filter.
        const ACC_FILTER    = 0x08;
        const SLEEP         = 0x10;
    }
}

bitflags! {
    /// CDR register bits.
    pub struct ClockDivider: u8 {
        /// Divider bits for the CLKOUT pin.
        const CLK_OUT       = 0x07;
        const CLKOUT_OFF    = 0x08;
        const RXINT_EN      = 0x20;
        /// Bypass the RX input comparator.
        const CBP           = 0x40;
        /// Extended register layout.
        const PELICAN       = 0x80;
    }
}

bitflags! {
    /// OCR register bits.
    pub struct OutputControl: u8 {
        const MODE_TEST     = 0x01;
        const MODE_NORMAL   = 0x02;
        const MODE_CLOCK    = 0x03;
        const TX0_INVERT    = 0x04;
        const TX0_PULLDOWN  = 0x08;
        const TX0_PULLUP    = 0x10;
        const TX0_PUSHPULL  = 0x18;
        const TX1_INVERT    = 0x20;
        const TX1_PULLDOWN  = 0x40;
        const TX1_PULLUP    = 0x80;
        const TX1_PUSHPULL  = 0xc0;
    }
}
