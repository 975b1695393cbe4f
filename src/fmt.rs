//! Logging shims.
//!
//! Forward to `defmt` when the `defmt` feature is on, otherwise to `log` when
//! the `log` feature is on, otherwise expand to nothing. Format strings must stay
//! within the subset both backends accept (`{}`, `{:?}`, `{:02X}`).

macro_rules! rtc_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt")))]
        ::log::$level!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => { rtc_log!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { rtc_log!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { rtc_log!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { rtc_log!(error, $($arg)*) };
}
