//! DS1307 Real-Time Clock Driver
//!
//! Driver for the Maxim DS1307 I2C real-time clock
//!
//! Features:
//! - Read/write the full date/time block in one transaction
//! - Time-of-day only access (3 registers, with range validation)
//! - Oscillator (clock halt) control
//! - Square-wave output configuration
//!
//! Notes:
//! - The chip runs in 24h mode only here. Bit 6 of the hours register (12/24
//!   select) is masked off on read and never set on write; bit 5 is the
//!   20-hour digit in 24h mode and is kept.
//! - The clock halt flag lives in bit 7 of the seconds register. Every time
//!   write stores a decimal 0-59 there, which never sets bit 7, so writing the
//!   time always restarts a halted oscillator. This is chip behavior, not an
//!   API for oscillator control; use `set_oscillator` for that.
//! - Alarms and the 56 byte battery-backed RAM are not supported.

use embedded_hal::i2c::I2c;

use crate::datetime::CalendarTime;
use crate::drivers::bcd::{bcd_to_dec, dec_to_bcd};
use crate::drivers::sensor_trait::SensorDriver;
use crate::hardware::RtcConfig;

/// DS1307 register map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Seconds = 0x00,
    Minutes = 0x01,
    Hours = 0x02,
    DayOfWeek = 0x03,
    DayOfMonth = 0x04,
    Month = 0x05,
    Year = 0x06,
    Control = 0x07,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Clock halt bit in the seconds register
pub const CLOCK_HALT: u8 = 1 << 7;

/// Bits of the day-of-week register that always read as zero on a DS1307
const DAY_OF_WEEK_RESERVED: u8 = 0xF8;

/// Registers 0x00..=0x06
pub const BLOCK_LEN: usize = 7;

/// 0x00..=0x07; transfers never reach past the control register
const NUM_REGS: usize = 8;

/// Control register bits
pub mod ctrl {
    pub const OUT: u8 = 1 << 7;
    pub const SQWE: u8 = 1 << 4;
    pub const RS1: u8 = 1 << 1;
    pub const RS0: u8 = 1 << 0;
}

/// Square-wave output setting, written verbatim to the control register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SquareWave {
    Disabled = 0,
    Hz1 = ctrl::SQWE,
    Hz4096 = ctrl::SQWE | ctrl::RS0,
    Hz8192 = ctrl::SQWE | ctrl::RS1,
    Hz32768 = ctrl::SQWE | ctrl::RS1 | ctrl::RS0,
}

impl SquareWave {
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Per-register layout of the time block: value bits and the offset from
/// chip numbering to `CalendarTime` numbering.
struct Field {
    mask: u8,
    offset: i32,
}

/// Indexed by register address.
const FIELDS: [Field; BLOCK_LEN] = [
    Field { mask: 0x7F, offset: 0 },    // seconds, bit 7 = CH
    Field { mask: 0x7F, offset: 0 },    // minutes
    Field { mask: 0x3F, offset: 0 },    // hours, bit 6 = 12/24 select
    Field { mask: 0x07, offset: -1 },   // day of week, 1-7 on chip
    Field { mask: 0x3F, offset: 0 },    // day of month
    Field { mask: 0x1F, offset: 0 },    // month
    Field { mask: 0xFF, offset: 2000 }, // year, 00-99
];

fn decode_field(reg: Register, raw: u8) -> i32 {
    let field = &FIELDS[reg as usize];
    bcd_to_dec(raw & field.mask) as i32 + field.offset
}

fn encode_field(reg: Register, value: i32) -> u8 {
    let field = &FIELDS[reg as usize];
    dec_to_bcd((value - field.offset).rem_euclid(100) as u8) & field.mask
}

/// Decode a raw time block. Field ranges are not checked: a day-of-week
/// register of 0 decodes to weekday 255, which `CalendarTime::is_valid` rejects.
pub fn decode_block(raw: &[u8; BLOCK_LEN]) -> CalendarTime {
    // masked fields stay within -1..=165; the `as u8` cast wraps -1 to 255
    let byte = |reg: Register| decode_field(reg, raw[reg as usize]) as u8;

    CalendarTime {
        second: byte(Register::Seconds),
        minute: byte(Register::Minutes),
        hour: byte(Register::Hours),
        weekday: byte(Register::DayOfWeek),
        day: byte(Register::DayOfMonth),
        month: byte(Register::Month),
        year: decode_field(Register::Year, raw[Register::Year as usize]) as u16,
    }
}

/// Encode a time block. Out-of-range fields produce undefined register contents.
pub fn encode_block(dt: &CalendarTime) -> [u8; BLOCK_LEN] {
    [
        encode_field(Register::Seconds, dt.second as i32),
        encode_field(Register::Minutes, dt.minute as i32),
        encode_field(Register::Hours, dt.hour as i32),
        encode_field(Register::DayOfWeek, dt.weekday as i32),
        encode_field(Register::DayOfMonth, dt.day as i32),
        encode_field(Register::Month, dt.month as i32),
        encode_field(Register::Year, dt.year as i32),
    ]
}

/// DS1307 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    I2cRead,
    I2cWrite,
    /// Register contents are not a valid time, or the device is not a DS1307
    InvalidData,
}

impl Error {
    /// Bus transaction failed, as opposed to bad register contents.
    pub const fn is_transport(self) -> bool {
        matches!(self, Error::I2cRead | Error::I2cWrite)
    }
}

/// DS1307 driver (stateless; borrows bus)
pub struct Ds1307 {
    config: RtcConfig,
}

impl Default for Ds1307 {
    fn default() -> Self {
        Self::new(RtcConfig::default())
    }
}

impl Ds1307 {
    pub const fn new(config: RtcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RtcConfig {
        &self.config
    }

    /// Check that a DS1307 answers and its day-of-week register has no reserved bits set.
    pub fn probe<I2C, E>(&mut self, i2c: &mut I2C) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        let day_of_week = self.read_register(i2c, Register::DayOfWeek)?;
        if day_of_week & DAY_OF_WEEK_RESERVED != 0 {
            warn!("DS1307 day-of-week register 0x{:02X} has reserved bits set", day_of_week);
            return Err(Error::InvalidData);
        }
        Ok(())
    }

    /// Stateless presence check, safe to repeat.
    pub fn detect<I2C, E>(&mut self, i2c: &mut I2C) -> bool
    where I2C: I2c<Error = E> {
        let present = self.probe(i2c).is_ok();
        debug!("DS1307 detect: {}", present);
        present
    }

    /// Start or stop the oscillator, keeping the current seconds count.
    pub fn set_oscillator<I2C, E>(&mut self, i2c: &mut I2C, enable: bool) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        let mut seconds = self.read_register(i2c, Register::Seconds)?;
        if enable {
            seconds &= !CLOCK_HALT;
        } else {
            seconds |= CLOCK_HALT;
        }
        self.write_register(i2c, Register::Seconds, seconds)?;
        info!("DS1307 oscillator {}", if enable { "enabled" } else { "halted" });
        Ok(())
    }

    /// True when the clock halt bit is set. A failed read also reports `true`:
    /// the stored time cannot be trusted either way.
    pub fn is_oscillator_stopped<I2C, E>(&mut self, i2c: &mut I2C) -> bool
    where I2C: I2c<Error = E> {
        match self.read_register(i2c, Register::Seconds) {
            Ok(seconds) => seconds & CLOCK_HALT != 0,
            Err(_) => true,
        }
    }

    /// Read the full date/time block in a single transaction.
    pub fn read_datetime<I2C, E>(&mut self, i2c: &mut I2C) -> Result<CalendarTime, Error>
    where I2C: I2c<Error = E> {
        SensorDriver::read(self, i2c)
    }

    /// Write the full date/time block in a single transaction. The caller
    /// supplies in-range values; nothing is validated. Restarts the oscillator.
    pub fn write_datetime<I2C, E>(&mut self, i2c: &mut I2C, dt: &CalendarTime) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        let block = encode_block(dt);
        self.write_registers(i2c, Register::Seconds, &block)?;
        debug!("DS1307 datetime written: {}", dt.format().as_str());
        Ok(())
    }

    /// Date/time from discrete fields. `month` is 1-12, `weekday` 0-6 (0=Sunday).
    #[allow(clippy::too_many_arguments)]
    pub fn set_date_time<I2C, E>(
        &mut self,
        i2c: &mut I2C,
        hour: u8,
        minute: u8,
        second: u8,
        day: u8,
        month: u8,
        year: u16,
        weekday: u8,
    ) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        let dt = CalendarTime { year, month, day, weekday, hour, minute, second };
        self.write_datetime(i2c, &dt)
    }

    /// Current time as Unix seconds. The weekday register plays no part.
    pub fn epoch<I2C, E>(&mut self, i2c: &mut I2C) -> Result<i64, Error>
    where I2C: I2c<Error = E> {
        let dt = self.read_datetime(i2c)?;
        let unix = dt.to_unix().ok_or_else(|| {
            warn!("DS1307 holds an impossible date: {}", dt.format().as_str());
            Error::InvalidData
        })?;
        Ok(unix)
    }

    /// Set the clock from Unix seconds. Write only.
    pub fn set_epoch<I2C, E>(&mut self, i2c: &mut I2C, t: i64) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        let dt = CalendarTime::from_unix(t).ok_or(Error::InvalidData)?;
        self.write_datetime(i2c, &dt)
    }

    /// Read hours, minutes and seconds. Unlike `read_datetime`, out-of-range
    /// values are rejected, which catches an uninitialized chip.
    pub fn time<I2C, E>(&mut self, i2c: &mut I2C) -> Result<(u8, u8, u8), Error>
    where I2C: I2c<Error = E> {
        let mut raw = [0u8; 3];
        self.read_registers(i2c, Register::Seconds, &mut raw)?;

        let second = decode_field(Register::Seconds, raw[0]) as u8;
        let minute = decode_field(Register::Minutes, raw[1]) as u8;
        let hour = decode_field(Register::Hours, raw[2]) as u8;

        if second > 59 || minute > 59 || hour > 23 {
            warn!("DS1307 returned invalid time {}:{}:{}", hour, minute, second);
            return Err(Error::InvalidData);
        }
        Ok((hour, minute, second))
    }

    /// Write hours, minutes and seconds only. Restarts the oscillator.
    pub fn set_time<I2C, E>(&mut self, i2c: &mut I2C, hour: u8, minute: u8, second: u8) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        let raw = [
            encode_field(Register::Seconds, second as i32),
            encode_field(Register::Minutes, minute as i32),
            encode_field(Register::Hours, hour as i32),
        ];
        self.write_registers(i2c, Register::Seconds, &raw)
    }

    pub fn set_square_wave<I2C, E>(&mut self, i2c: &mut I2C, sqw: SquareWave) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        self.write_register(i2c, Register::Control, sqw.bits())?;
        info!("DS1307 square wave: {:?}", sqw);
        Ok(())
    }

    /// Read a single register
    pub fn read_register<I2C, E>(&mut self, i2c: &mut I2C, register: Register) -> Result<u8, Error>
    where I2C: I2c<Error = E> {
        let mut buffer = [0u8; 1];
        self.read_registers(i2c, register, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Write a single register
    pub fn write_register<I2C, E>(&mut self, i2c: &mut I2C, register: Register, value: u8) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        self.write_registers(i2c, register, &[value])
    }

    /// Address write, repeated start, then read `buffer.len()` registers.
    fn read_registers<I2C, E>(&mut self, i2c: &mut I2C, start: Register, buffer: &mut [u8]) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        debug_assert!(start as usize + buffer.len() <= NUM_REGS);
        i2c.write_read(self.config.address, &[start.addr()], buffer)
            .map_err(|_| Error::I2cRead)
    }

    fn write_registers<I2C, E>(&mut self, i2c: &mut I2C, start: Register, data: &[u8]) -> Result<(), Error>
    where I2C: I2c<Error = E> {
        debug_assert!(start as usize + data.len() <= NUM_REGS);
        let mut write_buffer = [0u8; NUM_REGS + 1];
        write_buffer[0] = start.addr();
        write_buffer[1..=data.len()].copy_from_slice(data);

        i2c.write(self.config.address, &write_buffer[..=data.len()])
            .map_err(|_| Error::I2cWrite)
    }
}

impl<I2C, E> SensorDriver<I2C> for Ds1307
where
    I2C: I2c<Error = E>,
{
    type RawData = [u8; BLOCK_LEN];
    type ParsedData = CalendarTime;
    type Error = Error;

    fn read_raw(&mut self, bus: &mut I2C) -> Result<Self::RawData, Self::Error> {
        let mut buffer = [0u8; BLOCK_LEN];
        self.read_registers(bus, Register::Seconds, &mut buffer)?;
        Ok(buffer)
    }

    fn parse(&self, raw: Self::RawData) -> Result<Self::ParsedData, Self::Error> {
        Ok(decode_block(&raw))
    }
}
