//! # Image Time
//!
//! U-View stores the acquisition time as a Windows `FILETIME`:
//! 100-nanosecond ticks since 1601-01-01 00:00:00. Contains the
//! functions for turning those ticks into useful structures.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Number of `FILETIME` ticks per second.
pub const TICKS_PER_SECOND : u64 = 10_000_000;

/// Returns the start of the Windows epoch, 1601-01-01 00:00:00.
pub fn windows_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1601, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Converts a `FILETIME` tick count into an absolute timestamp
/// (seconds are `ticks / 10^7` past the epoch, the remainder
/// kept at 100 ns resolution).
///
/// Returns `None` only if the result would not be representable.
///
/// ## Example
///
/// ```rust
/// use leemdat::filetime_to_datetime;
///
/// let stamp = filetime_to_datetime(116_444_736_000_000_000).unwrap();
/// assert_eq!(stamp.to_string(), "1970-01-01 00:00:00");
/// ```
pub fn filetime_to_datetime(ticks : u64) -> Option<NaiveDateTime> {
    let seconds = TimeDelta::try_seconds((ticks / TICKS_PER_SECOND) as i64)?;
    let fraction = TimeDelta::nanoseconds(((ticks % TICKS_PER_SECOND) * 100) as i64);
    windows_epoch()
        .checked_add_signed(seconds)?
        .checked_add_signed(fraction)
}
