//! Fixed-width `YYYY?MM?DD?HH?MM?SS` timestamp reader.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use super::cursor::LineCursor;

/// How wall-clock timestamps in the log map to absolute time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeZoneMode {
    /// The machine's local zone; DST is resolved per timestamp.
    #[default]
    Local,
    /// Timestamps are already UTC.
    Utc,
}

/// Failure reading a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    /// Input ended before the timestamp was complete.
    Truncated,
    /// A field was not a run of digits of the expected width, or the fields
    /// do not form a real date and time.
    Malformed(&'static str),
}

const FIELDS: [(&str, usize); 6] = [
    ("year", 4),
    ("month", 2),
    ("day", 2),
    ("hour", 2),
    ("minute", 2),
    ("second", 2),
];

/// Reads one timestamp at the cursor and returns seconds since the Unix epoch.
///
/// A single separator character is skipped before each field after the year
/// when present. Field ranges are left to the date conversion.
pub fn read_timestamp(cursor: &mut LineCursor<'_>, zone: TimeZoneMode) -> Result<i64, TimestampError> {
    let mut parts = [0u32; 6];
    for (idx, &(field, width)) in FIELDS.iter().enumerate() {
        if idx > 0 {
            match cursor.peek() {
                None => return Err(TimestampError::Truncated),
                Some(c) if !c.is_ascii_digit() && c != '\n' => {
                    cursor.bump();
                }
                Some(_) => {}
            }
        }
        parts[idx] = cursor
            .take_digits(width)
            .map_err(|_| TimestampError::Malformed(field))?
            .ok_or(TimestampError::Truncated)?;
    }

    let [year, month, day, hour, minute, second] = parts;
    let naive = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or(TimestampError::Malformed("date"))?
        .and_hms_opt(hour, minute, second)
        .ok_or(TimestampError::Malformed("time"))?;
    to_epoch(naive, zone)
}

/// Converts a wall-clock time in `zone` to seconds since the epoch.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant; times
/// skipped by a DST jump are moved forward by an hour.
pub fn to_epoch(naive: NaiveDateTime, zone: TimeZoneMode) -> Result<i64, TimestampError> {
    match zone {
        TimeZoneMode::Utc => Ok(naive.and_utc().timestamp()),
        TimeZoneMode::Local => {
            let resolved = match chrono::Local.from_local_datetime(&naive) {
                LocalResult::Single(t) => Some(t),
                LocalResult::Ambiguous(earliest, _) => Some(earliest),
                LocalResult::None => chrono::Local
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest(),
            };
            resolved
                .map(|t| t.timestamp())
                .ok_or(TimestampError::Malformed("local time"))
        }
    }
}
