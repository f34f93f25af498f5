//! Shift duration calculation.
//!
//! This module computes elapsed hours and the overnight/24h flags for a
//! shift from its calendar day and two local wall-clock times. An end
//! time numerically at or before the start time means the shift runs
//! into the next day; an end equal to the start is a full 24-hour shift,
//! never a zero-length one.

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Minutes in a full day, the threshold for the 24h flag.
const FULL_DAY_MINUTES: i64 = 24 * 60;

/// The derived timing facts for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftDuration {
    /// Elapsed hours, rounded to 2 decimal places.
    pub duration_hours: Decimal,
    /// True when the shift crosses midnight.
    pub is_overnight: bool,
    /// True when the shift spans exactly 24 hours.
    pub is_24h: bool,
}

/// Parses a `HH:MM` wall-clock time.
///
/// This is the validation boundary for time input: anything that reaches
/// [`compute_duration`] is well-formed by construction.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTime`] for anything that is not a valid
/// `HH:MM` string.
///
/// # Example
///
/// ```
/// use roster_engine::scheduling::parse_hhmm;
///
/// assert!(parse_hhmm("22:30").is_ok());
/// assert!(parse_hhmm("24:00").is_err());
/// assert!(parse_hhmm("8am").is_err());
/// ```
pub fn parse_hhmm(value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| EngineError::InvalidTime {
        value: value.to_string(),
    })
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDate`] for anything that is not a valid
/// `YYYY-MM-DD` string.
pub fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        value: value.to_string(),
    })
}

/// Computes the duration and day-span flags for a shift.
///
/// Combines `date` with both times into local timestamps. When the end
/// is at or before the start, the end is pushed forward by one day and
/// the shift is flagged overnight; an adjusted elapsed time of exactly
/// 24 hours additionally sets the 24h flag.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use roster_engine::scheduling::compute_duration;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let start = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
///
/// let duration = compute_duration(date, start, end);
/// assert_eq!(duration.duration_hours, Decimal::from(8));
/// assert!(duration.is_overnight);
/// assert!(!duration.is_24h);
/// ```
pub fn compute_duration(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> ShiftDuration {
    let start_dt = date.and_time(start);
    let mut end_dt = date.and_time(end);
    let mut is_overnight = false;

    if end_dt <= start_dt {
        // Ends on the next day, or spans the full 24 hours.
        end_dt += Duration::days(1);
        is_overnight = true;
    }

    let elapsed_minutes = (end_dt - start_dt).num_minutes();
    let is_24h = is_overnight && elapsed_minutes == FULL_DAY_MINUTES;
    let duration_hours = (Decimal::from(elapsed_minutes) / Decimal::from(60)).round_dp(2);

    ShiftDuration {
        duration_hours,
        is_overnight,
        is_24h,
    }
}
