//! Date helper functions

use chrono::{DateTime, Local, TimeZone};

/// Second-resolution stamp used for backup names and image cache busting
pub const STAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Format a date as a stamp
///
/// # Examples
/// ```ignore
/// stamp(&date) // -> "2024_01_15_10_30_00"
/// ```
pub fn stamp<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(STAMP_FORMAT).to_string()
}

/// Stamp for the current local time
pub fn now_stamp() -> String {
    stamp(&Local::now())
}
