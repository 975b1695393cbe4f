//! Packed BCD helpers: high nibble is tens, low nibble is units.
//!
//! Only 0..=99 (and nibbles 0..=9) are meaningful. Anything else yields a
//! bounded but meaningless value; neither function panics.

/// Convert BCD to decimal
#[inline]
pub const fn bcd_to_dec(bcd: u8) -> u8 {
    ((bcd >> 4) * 10).wrapping_add(bcd & 0x0F)
}

/// Convert decimal to BCD
#[inline]
pub const fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}
