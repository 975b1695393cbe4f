//! Calendar time as exposed to applications, plus epoch conversion.
//!
//! Conversion is pure calendar arithmetic (via `chrono`, no clock source) and
//! never touches the RTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use core::fmt::Write;
use heapless::String;

/// Date and time in conventional (non-BCD) form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub year: u16,   // 2000-2099
    pub month: u8,   // 1-12
    pub day: u8,     // 1-31
    pub weekday: u8, // 0-6 (0=Sunday)
    pub hour: u8,    // 0-23
    pub minute: u8,  // 0-59
    pub second: u8,  // 0-59
}

impl CalendarTime {
    /// Build from individual fields. No range checking is done here.
    pub const fn new(year: u16, month: u8, day: u8, weekday: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self { year, month, day, weekday, hour, minute, second }
    }

    /// True when every field is inside the range the chip can hold.
    pub fn is_valid(&self) -> bool {
        (2000..=2099).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.weekday <= 6
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
    }

    /// Recompute `weekday` from the date. Leaves it untouched if the date does not exist.
    pub fn calculate_weekday(&mut self) {
        if let Some(date) = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32) {
            self.weekday = date.weekday().num_days_from_sunday() as u8;
        }
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
    }

    /// Returns `None` for years outside 0..=65535.
    pub fn from_naive(dt: &NaiveDateTime) -> Option<Self> {
        let year = u16::try_from(dt.year()).ok()?;
        Some(Self {
            year,
            month: dt.month() as u8,
            day: dt.day() as u8,
            weekday: dt.weekday().num_days_from_sunday() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        })
    }

    /// Seconds since 1970-01-01 00:00:00 UTC. `weekday` is ignored.
    pub fn to_unix(&self) -> Option<i64> {
        self.to_naive().map(|dt| dt.and_utc().timestamp())
    }

    pub fn from_unix(secs: i64) -> Option<Self> {
        let dt = DateTime::from_timestamp(secs, 0)?;
        Self::from_naive(&dt.naive_utc())
    }

    /// Format as `YYYY-MM-DD HH:MM:SS`
    pub fn format(&self) -> String<32> {
        let mut output = String::new();
        let _ = core::write!(output, "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                           self.year, self.month, self.day,
                           self.hour, self.minute, self.second);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_calculation() {
        let mut dt = CalendarTime::new(2025, 7, 7, 0, 18, 30, 0);
        dt.calculate_weekday();
        assert_eq!(dt.weekday, 1); // July 7, 2025 is a Monday

        let mut y2k = CalendarTime::new(2000, 1, 1, 0, 0, 0, 0);
        y2k.calculate_weekday();
        assert_eq!(y2k.weekday, 6);
    }

    #[test]
    fn epoch_round_trip_across_boundaries() {
        let samples = [
            CalendarTime::new(2000, 1, 1, 6, 0, 0, 0),
            CalendarTime::new(2023, 12, 31, 0, 23, 59, 59),
            CalendarTime::new(2024, 1, 1, 1, 0, 0, 0),
            CalendarTime::new(2024, 2, 28, 3, 23, 59, 59),
            CalendarTime::new(2024, 2, 29, 4, 0, 0, 0),
            CalendarTime::new(2024, 3, 1, 5, 0, 0, 0),
            CalendarTime::new(2023, 4, 30, 0, 12, 0, 0),
            CalendarTime::new(2099, 12, 31, 4, 23, 59, 59),
        ];
        for dt in samples {
            let secs = dt.to_unix().unwrap();
            assert_eq!(CalendarTime::from_unix(secs), Some(dt));
        }
    }

    #[test]
    fn epoch_known_values() {
        assert_eq!(CalendarTime::new(2000, 1, 1, 6, 0, 0, 0).to_unix(), Some(946_684_800));
        assert_eq!(CalendarTime::new(2024, 2, 29, 4, 0, 0, 0).to_unix(), Some(1_709_164_800));

        let last = CalendarTime::new(2023, 12, 31, 0, 23, 59, 59).to_unix().unwrap();
        let next = CalendarTime::from_unix(last + 1).unwrap();
        assert_eq!(next, CalendarTime::new(2024, 1, 1, 1, 0, 0, 0));
    }

    #[test]
    fn impossible_dates_have_no_epoch() {
        assert_eq!(CalendarTime::new(2023, 2, 29, 0, 0, 0, 0).to_unix(), None);
        assert_eq!(CalendarTime::default().to_unix(), None);
    }

    #[test]
    fn validity_ranges() {
        assert!(CalendarTime::new(2024, 2, 29, 4, 23, 59, 59).is_valid());
        assert!(!CalendarTime::new(2024, 13, 1, 0, 0, 0, 0).is_valid());
        assert!(!CalendarTime::new(2024, 1, 1, 7, 0, 0, 0).is_valid());
        assert!(!CalendarTime::new(1999, 1, 1, 0, 0, 0, 0).is_valid());
        assert!(!CalendarTime::default().is_valid());
    }

    #[test]
    fn format_is_zero_padded() {
        let dt = CalendarTime::new(2025, 7, 7, 1, 8, 5, 9);
        assert_eq!(dt.format().as_str(), "2025-07-07 08:05:09");
    }
}
