//! Hardware capability seam.
//!
//! The real radio/LED/sensor drivers live outside this core. Missions
//! see hardware only through this trait and are expected to degrade
//! gracefully when `radio_available` reports false.

use std::sync::atomic::{AtomicBool, Ordering};

/// Minimal hardware surface consumed by missions.
pub trait Hal: Send + Sync {
    /// Whether the radio passed its presence check and is usable.
    fn radio_available(&self) -> bool;

    /// Set the status LED color. Best-effort.
    fn set_led(&self, r: u8, g: u8, b: u8);
}

/// A driverless HAL for tests and radio-less development.
#[derive(Debug)]
pub struct NullHal {
    radio: AtomicBool,
}

impl NullHal {
    pub fn new() -> Self {
        Self {
            radio: AtomicBool::new(true),
        }
    }

    /// A HAL whose radio check failed, for degraded-path tests.
    pub fn without_radio() -> Self {
        Self {
            radio: AtomicBool::new(false),
        }
    }

    /// Flip radio availability at runtime.
    pub fn set_radio_available(&self, available: bool) {
        self.radio.store(available, Ordering::Relaxed);
    }
}

impl Default for NullHal {
    fn default() -> Self {
        Self::new()
    }
}

impl Hal for NullHal {
    fn radio_available(&self) -> bool {
        self.radio.load(Ordering::Relaxed)
    }

    fn set_led(&self, _r: u8, _g: u8, _b: u8) {}
}
