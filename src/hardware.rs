//! # Hardware Configuration
//!
//! Bus address for the RTC. Board-specific overrides go through `RtcConfig`
//! instead of touching driver code.

/// DS1307 7-bit I2C address (0xD0 >> 1)
pub const DS1307_ADDRESS: u8 = 0x68;

/// RTC configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcConfig {
    /// I2C address used for every transaction
    pub address: u8,
}

impl RtcConfig {
    pub const fn new() -> Self {
        Self { address: DS1307_ADDRESS }
    }

    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self::new()
    }
}
