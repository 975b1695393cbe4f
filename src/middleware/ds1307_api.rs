//! DS1307 middleware: wraps the raw driver and offers a simple API
//! for initializing and fetching current time in a convenient form.
//!
//! Failures never leave stale data behind: a failed `now` resets `last` to the
//! all-zero time, and `epoch` reports 0 when the chip cannot be read.

use crate::datetime::CalendarTime;
use crate::drivers::ds1307::{Ds1307, Error as RtcError};
use embedded_hal::i2c::I2c;
use heapless::String;
use core::fmt::Write as _;

pub struct Ds1307Api<'d> {
    driver: &'d mut Ds1307,
    pub present: bool,
    last: CalendarTime,
}

impl<'d> Ds1307Api<'d> {
    pub fn new(driver: &'d mut Ds1307) -> Self {
        Self { driver, present: false, last: CalendarTime::default() }
    }

    /// Detect the chip and mark it present. A halted oscillator is reported
    /// but does not fail initialization; the application decides whether to
    /// restart the clock or program a new time.
    pub fn init<I2C, E>(&mut self, i2c: &mut I2C) -> Result<(), RtcError>
    where I2C: I2c<Error = E> {
        if let Err(e) = self.driver.probe(i2c) {
            self.present = false;
            error!("DS1307 not detected: {:?}", e);
            return Err(e);
        }
        self.present = true;

        if self.driver.is_oscillator_stopped(i2c) {
            warn!("DS1307 oscillator halted, stored time is not valid");
        }
        info!("DS1307 initialized");
        Ok(())
    }

    pub fn now<I2C, E>(&mut self, i2c: &mut I2C) -> Result<CalendarTime, RtcError>
    where I2C: I2c<Error = E> {
        match self.driver.read_datetime(i2c) {
            Ok(dt) => { self.last = dt; Ok(dt) },
            Err(e) => { self.last = CalendarTime::default(); Err(e) }
        }
    }

    pub fn set_datetime<I2C, E>(&mut self, i2c: &mut I2C, dt: &CalendarTime) -> Result<(), RtcError>
    where I2C: I2c<Error = E> {
        self.driver.write_datetime(i2c, dt)
    }

    /// Unix seconds, or 0 if the chip could not be read.
    pub fn epoch<I2C, E>(&mut self, i2c: &mut I2C) -> i64
    where I2C: I2c<Error = E> {
        self.driver.epoch(i2c).unwrap_or(0)
    }

    pub fn set_epoch<I2C, E>(&mut self, i2c: &mut I2C, t: i64) -> Result<(), RtcError>
    where I2C: I2c<Error = E> {
        self.driver.set_epoch(i2c, t)
    }

    pub fn is_stopped<I2C, E>(&mut self, i2c: &mut I2C) -> bool
    where I2C: I2c<Error = E> {
        self.driver.is_oscillator_stopped(i2c)
    }

    pub fn start_clock<I2C, E>(&mut self, i2c: &mut I2C) -> Result<(), RtcError>
    where I2C: I2c<Error = E> {
        self.driver.set_oscillator(i2c, true)
    }

    pub fn last(&self) -> &CalendarTime { &self.last }

    pub fn format_iso8601(&self) -> String<32> {
        let mut s = String::new();
        let _ = core::write!(s, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.last.year, self.last.month, self.last.day,
            self.last.hour, self.last.minute, self.last.second);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::DS1307_ADDRESS as ADDR;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
    use std::vec;

    #[test]
    fn init_marks_present() {
        let expectations = [
            I2cTrans::write_read(ADDR, vec![0x03], vec![0x02]),
            I2cTrans::write_read(ADDR, vec![0x00], vec![0x80]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut driver = Ds1307::default();
        let mut api = Ds1307Api::new(&mut driver);
        api.init(&mut i2c).unwrap();
        assert!(api.present);
        i2c.done();
    }

    #[test]
    fn init_clears_present_on_wrong_chip() {
        let expectations = [I2cTrans::write_read(ADDR, vec![0x03], vec![0x40])];
        let mut i2c = I2cMock::new(&expectations);
        let mut driver = Ds1307::default();
        let mut api = Ds1307Api::new(&mut driver);
        api.present = true;
        assert_eq!(api.init(&mut i2c), Err(RtcError::InvalidData));
        assert!(!api.present);
        i2c.done();
    }

    #[test]
    fn failed_read_zeroes_last() {
        let expectations = [
            I2cTrans::write_read(ADDR, vec![0x00], vec![0x45, 0x30, 0x12, 0x02, 0x07, 0x07, 0x25]),
            I2cTrans::write_read(ADDR, vec![0x00], vec![0; 7]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut driver = Ds1307::default();
        let mut api = Ds1307Api::new(&mut driver);

        api.now(&mut i2c).unwrap();
        assert_eq!(api.format_iso8601().as_str(), "2025-07-07T12:30:45Z");

        assert_eq!(api.now(&mut i2c), Err(RtcError::I2cRead));
        assert_eq!(*api.last(), CalendarTime::default());
        i2c.done();
    }

    #[test]
    fn epoch_sentinel_on_failure() {
        let expectations = [I2cTrans::write_read(ADDR, vec![0x00], vec![0; 7]).with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        let mut driver = Ds1307::default();
        let mut api = Ds1307Api::new(&mut driver);
        assert_eq!(api.epoch(&mut i2c), 0);
        i2c.done();
    }

    #[test]
    fn epoch_survives_cleared_weekday() {
        let expectations = [I2cTrans::write_read(ADDR, vec![0x00], vec![0x00, 0x00, 0x12, 0x00, 0x15, 0x03, 0x24])];
        let mut i2c = I2cMock::new(&expectations);
        let mut driver = Ds1307::default();
        let mut api = Ds1307Api::new(&mut driver);
        assert_eq!(api.epoch(&mut i2c), 1_710_504_000);
        i2c.done();
    }

    #[test]
    fn start_clock_clears_halt() {
        let expectations = [
            I2cTrans::write_read(ADDR, vec![0x00], vec![0x80]),
            I2cTrans::write_read(ADDR, vec![0x00], vec![0x80]),
            I2cTrans::write(ADDR, vec![0x00, 0x00]),
            I2cTrans::write_read(ADDR, vec![0x00], vec![0x00]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut driver = Ds1307::default();
        let mut api = Ds1307Api::new(&mut driver);
        assert!(api.is_stopped(&mut i2c));
        api.start_clock(&mut i2c).unwrap();
        assert!(!api.is_stopped(&mut i2c));
        i2c.done();
    }
}
