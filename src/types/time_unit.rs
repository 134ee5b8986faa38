//! Rounding units for the time-ring layout.
//!
//! Two duration tables live here and they intentionally disagree on the
//! length of a month:
//! - `TimeUnit::duration` (30-day month) is used to derive a ring count from
//!   an explicit unit.
//! - `TimeUnit::rounding_width` (31-day month) is used to select and round
//!   the ring step.
//! Unifying them changes which unit the planner picks near month boundaries.

use chrono::{Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HyperframeError;

const SECOND: i64 = 1;
const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;

/// A human-meaningful time granularity, ordered from finest to coarsest.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    #[serde(rename = "s")]
    Second,
    #[serde(rename = "m")]
    Minute,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
    #[serde(rename = "Y")]
    Year,
    #[serde(rename = "C")]
    Century,
}

/// Canonical unit durations in seconds (30-day month, 365-day year).
static UNIT_SECONDS: [(TimeUnit, i64); 8] = [
    (TimeUnit::Second, SECOND),
    (TimeUnit::Minute, MINUTE),
    (TimeUnit::Hour, HOUR),
    (TimeUnit::Day, DAY),
    (TimeUnit::Week, WEEK),
    (TimeUnit::Month, 30 * DAY),
    (TimeUnit::Year, 365 * DAY),
    (TimeUnit::Century, 100 * 365 * DAY),
];

/// Bin widths used when selecting and rounding a ring step (31-day month).
static ROUNDING_SECONDS: [(TimeUnit, i64); 8] = [
    (TimeUnit::Second, SECOND),
    (TimeUnit::Minute, MINUTE),
    (TimeUnit::Hour, HOUR),
    (TimeUnit::Day, DAY),
    (TimeUnit::Week, WEEK),
    (TimeUnit::Month, 31 * DAY),
    (TimeUnit::Year, 365 * DAY),
    (TimeUnit::Century, 100 * 365 * DAY),
];

fn lookup(table: &[(TimeUnit, i64); 8], unit: TimeUnit) -> i64 {
    // Tables are indexed in declaration order.
    table[unit as usize].1
}

impl TimeUnit {
    /// All units, finest first. This is the selection order of the planner.
    pub const ALL: [TimeUnit; 8] = [
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::Year,
        TimeUnit::Century,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "D",
            TimeUnit::Week => "W",
            TimeUnit::Month => "M",
            TimeUnit::Year => "Y",
            TimeUnit::Century => "C",
        }
    }

    /// Canonical duration of one unit (months approximated as 30 days).
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(lookup(&UNIT_SECONDS, *self))
    }

    /// Width of one ring when this unit is the rounding unit (months approximated as 31 days).
    pub fn rounding_width(&self) -> TimeDelta {
        TimeDelta::seconds(lookup(&ROUNDING_SECONDS, *self))
    }

    pub(crate) fn rounding_width_secs(&self) -> i64 {
        lookup(&ROUNDING_SECONDS, *self)
    }

    /// The calendar-aware step used to place ring boundaries.
    pub fn calendar_step(&self) -> CalendarOffset {
        match self {
            TimeUnit::Month => CalendarOffset::Months(1),
            TimeUnit::Year => CalendarOffset::Months(12),
            TimeUnit::Century => CalendarOffset::Months(1200),
            fixed => CalendarOffset::Fixed(fixed.duration()),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TimeUnit {
    type Err = HyperframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeUnit::ALL
            .into_iter()
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| {
                HyperframeError::config(format!(
                    "Unknown time unit '{}'; expected one of s, m, h, D, W, M, Y, C",
                    s
                ))
            })
    }
}

//==================================================================================
// Calendar offsets
//==================================================================================

/// A step that is either a fixed duration or a whole number of calendar months.
///
/// Month-based offsets land on the same day-of-month (clamped to the month end),
/// so ring boundaries for `M`, `Y` and `C` follow the calendar rather than the
/// approximate rounding width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarOffset {
    Fixed(TimeDelta),
    Months(u32),
}

impl CalendarOffset {
    /// Returns this offset repeated `n` times; `None` on overflow.
    pub fn times(&self, n: usize) -> Option<CalendarOffset> {
        match self {
            CalendarOffset::Fixed(delta) => i32::try_from(n)
                .ok()
                .and_then(|n| delta.checked_mul(n))
                .map(CalendarOffset::Fixed),
            CalendarOffset::Months(months) => u32::try_from(n)
                .ok()
                .and_then(|n| months.checked_mul(n))
                .map(CalendarOffset::Months),
        }
    }

    /// Adds the offset to an instant; `None` when the result is out of range.
    pub fn apply(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            CalendarOffset::Fixed(delta) => t.checked_add_signed(*delta),
            CalendarOffset::Months(months) => t.checked_add_months(Months::new(*months)),
        }
    }
}
