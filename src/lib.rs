//! # DS1307 Real-Time Clock
//!
//! Blocking driver for the Maxim DS1307 I2C RTC built on `embedded-hal` 1.0.
//!
//! Layout:
//! - `drivers`: raw chip access (register map, BCD codec, bus transactions)
//! - `middleware`: convenience wrapper keeping a presence flag and last read time
//! - `datetime`: calendar representation and epoch conversion
//! - `hardware`: bus address configuration
//!
//! The driver never owns the bus. Every call borrows `&mut I2C`, so a board
//! bus manager can hand the same peripheral to several drivers in turn.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod datetime;
pub mod drivers;
pub mod hardware;
pub mod middleware;

pub use datetime::CalendarTime;
pub use drivers::ds1307::{Ds1307, Error, Register, SquareWave};
pub use hardware::RtcConfig;
pub use middleware::ds1307_api::Ds1307Api;
