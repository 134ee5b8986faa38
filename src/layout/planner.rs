// In: src/layout/planner.rs

//! The time-bin planner.
//!
//! Given the timestamps of a node column (or an explicit range) it selects a
//! rounding unit, a ring width and rounded start/end instants. Arrow hands us
//! `i64` nanoseconds, but a handful of century rings already exceeds that
//! range, so all planning arithmetic widens to `i128` nanoseconds.

use arrow::array::{Array, TimestampNanosecondArray};
use arrow::compute::{max, min};
use chrono::{DateTime, NaiveDateTime, TimeDelta};

use crate::config::RingConfig;
use crate::error::HyperframeError;
use crate::types::{CalendarOffset, TimeUnit};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Node counts above this get 10 rings by default, otherwise 5.
const LARGE_INPUT_ROWS: usize = 1000;

/// Fully determines the ring geometry of one layout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxisPlan {
    pub unit: TimeUnit,
    /// Rounded ring width; label instants advance by this.
    pub step: TimeDelta,
    /// Calendar step; ring radii advance by this.
    pub offset: CalendarOffset,
    pub start_ns: i128,
    pub end_ns: i128,
    pub num_rings: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeAxisPlan {
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Radius units per nanosecond for a layout spanning `[min_r, max_r]`.
    pub fn radius_scale(&self, min_r: f64, max_r: f64) -> f64 {
        (max_r - min_r) / (self.end_ns - self.start_ns) as f64
    }
}

/// Nanoseconds since the epoch, without the `i64` ceiling of year 2262.
pub(crate) fn to_wide_nanos(t: NaiveDateTime) -> i128 {
    let utc = t.and_utc();
    utc.timestamp() as i128 * NANOS_PER_SECOND + utc.timestamp_subsec_nanos() as i128
}

/// Inverse of `to_wide_nanos`; `None` outside chrono's supported range.
pub(crate) fn from_wide_nanos(ns: i128) -> Option<NaiveDateTime> {
    let secs = i64::try_from(ns.div_euclid(NANOS_PER_SECOND)).ok()?;
    let nanos = ns.rem_euclid(NANOS_PER_SECOND) as u32;
    DateTime::from_timestamp(secs, nanos).map(|t| t.naive_utc())
}

fn out_of_range() -> HyperframeError {
    HyperframeError::config("ring range is outside the supported date range")
}

//==================================================================================
// 1. Unit Selection & Rounding
//==================================================================================

/// Picks the finest unit whose rounding width covers `step`.
///
/// `step` is truncated to whole seconds before comparing. An explicit
/// `time_unit` skips selection. Falls back to centuries.
pub fn find_round_bin_width(
    step: TimeDelta,
    time_unit: Option<TimeUnit>,
) -> (TimeUnit, CalendarOffset, TimeDelta) {
    if let Some(unit) = time_unit {
        log::debug!("FORCED unit {}", unit);
        return (unit, unit.calendar_step(), unit.rounding_width());
    }

    let step_secs = step.num_seconds();
    for unit in TimeUnit::ALL {
        if step_secs <= unit.rounding_width_secs() {
            log::debug!("HIT unit {} width {}s", unit, unit.rounding_width_secs());
            return (unit, unit.calendar_step(), unit.rounding_width());
        }
        log::debug!("MISS unit {} width {}s", unit, unit.rounding_width_secs());
    }

    let century = TimeUnit::Century;
    (century, century.calendar_step(), century.rounding_width())
}

/// Rounds `t_ns` half-up to the nearest multiple of `unit_ns`.
pub fn round_to_nearest(t_ns: i128, unit_ns: i128) -> i128 {
    let unit_ns = unit_ns.max(1);
    t_ns.saturating_add(unit_ns / 2).div_euclid(unit_ns) * unit_ns
}

//==================================================================================
// 2. Planning
//==================================================================================

/// Plans the rings for `timestamps`, honouring the range and unit overrides
/// in `config`.
///
/// # Errors
/// `EmptyTimeRange` when a bound is neither given nor derivable, and
/// `InvalidConfig` when the range is inverted or overflows.
pub fn plan_time_axis(
    timestamps: &TimestampNanosecondArray,
    config: &RingConfig,
) -> Result<TimeAxisPlan, HyperframeError> {
    // 1. Range.
    let start = match config.time_start {
        Some(t) => to_wide_nanos(t),
        None => min(timestamps).ok_or(HyperframeError::EmptyTimeRange)? as i128,
    };
    let end = match config.time_end {
        Some(t) => to_wide_nanos(t),
        None => max(timestamps).ok_or(HyperframeError::EmptyTimeRange)? as i128,
    };
    if end < start {
        return Err(HyperframeError::config(format!(
            "time range ends ({:?}) before it starts ({:?})",
            from_wide_nanos(end),
            from_wide_nanos(start)
        )));
    }
    let duration_ns = end - start;

    // 2. Ring count.
    let num_rings = match (config.num_rings, config.time_unit) {
        (Some(n), _) => n,
        (None, Some(unit)) => {
            let unit_ns = unit.duration().num_seconds() as i128 * NANOS_PER_SECOND;
            usize::try_from(duration_ns / unit_ns + 1).map_err(|_| out_of_range())?
        }
        (None, None) => {
            if timestamps.len() > LARGE_INPUT_ROWS {
                10
            } else {
                5
            }
        }
    };
    if num_rings == 0 {
        return Err(HyperframeError::config("num_rings must be at least 1"));
    }

    // 3. Unit.
    let raw_step_ns = duration_ns / num_rings as i128;
    let raw_step = i64::try_from(raw_step_ns.div_euclid(NANOS_PER_SECOND))
        .ok()
        .and_then(|secs| TimeDelta::new(secs, raw_step_ns.rem_euclid(NANOS_PER_SECOND) as u32))
        .ok_or_else(out_of_range)?;
    let (unit, offset, step) = find_round_bin_width(raw_step, config.time_unit);
    let step_ns = unit.rounding_width_secs() as i128 * NANOS_PER_SECOND;

    // 4. Rounded bounds.
    let start_ns = round_to_nearest(start, step_ns);
    let end_ns = step_ns
        .checked_mul(num_rings as i128)
        .and_then(|span| start_ns.checked_add(span))
        .map(|end| round_to_nearest(end, step_ns))
        .ok_or_else(out_of_range)?;
    let start_at = from_wide_nanos(start_ns).ok_or_else(out_of_range)?;
    let end_at = from_wide_nanos(end_ns).ok_or_else(out_of_range)?;

    log_metric!(
        "event" = "time_axis_plan",
        "unit" = unit,
        "raw_step_s" = raw_step.num_seconds(),
        "rings" = num_rings,
        "start" = start_at,
        "end" = end_at
    );

    Ok(TimeAxisPlan {
        unit,
        step,
        offset,
        start_ns,
        end_ns,
        num_rings,
        start: start_at,
        end: end_at,
    })
}
