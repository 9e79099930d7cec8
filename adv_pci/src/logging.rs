//! Device-prefixed logging on top of the `log` facade.
//!
//! Every record carries [crate::DRV_NAME] as target and the bus name of the
//! device as prefix. Installing a logger is left to the host.

/// Informational message about a device.
macro_rules! dev_info {
    ($pdev: expr, $fmt: literal $(, $($arg: tt)+)?) => {
        log::info!(
            target: $crate::DRV_NAME,
            concat!("{}: ", $fmt),
            $crate::bus::PciDevice::name(&$pdev)
            $(, $($arg)+)?
        )
    };
}

/// Warning about a device.
macro_rules! dev_warn {
    ($pdev: expr, $fmt: literal $(, $($arg: tt)+)?) => {
        log::warn!(
            target: $crate::DRV_NAME,
            concat!("{}: ", $fmt),
            $crate::bus::PciDevice::name(&$pdev)
            $(, $($arg)+)?
        )
    };
}

/// Error message about a device.
macro_rules! dev_err {
    ($pdev: expr, $fmt: literal $(, $($arg: tt)+)?) => {
        log::error!(
            target: $crate::DRV_NAME,
            concat!("{}: ", $fmt),
            $crate::bus::PciDevice::name(&$pdev)
            $(, $($arg)+)?
        )
    };
}

/// Debug message about a device,
/// only compiled in debug mode.
macro_rules! dev_dbg {
    ($pdev: expr, $fmt: literal $(, $($arg: tt)+)?) => {
        #[cfg(debug_assertions)]
        {
            log::debug!(
                target: $crate::DRV_NAME,
                concat!("{}: ", $fmt),
                $crate::bus::PciDevice::name(&$pdev)
                $(, $($arg)+)?
            )
        }
    };
}
