//! Date/timezone normalization for time-window parameters.
//!
//! Every accessor that takes a time window runs it through `TimeWindow`, so
//! calendar dates, naive date-times and zoned date-times mean the same thing
//! everywhere:
//!
//! - a calendar date widens to `00:00:00` (start) or `23:59:59` (end)
//! - a naive date-time is read as wall-clock time in the subject timezone
//! - a zoned date-time is converted into the subject timezone
//!
//! The process-local timezone is never consulted.

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone,
};
use chrono_tz::Tz;

use lovens_core::constants::WIRE_DATETIME_FORMAT;
use lovens_core::error::{LvError, LvResult};

/// One boundary of a time window, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// A whole calendar day.
    Date(NaiveDate),
    /// Wall-clock time without a timezone.
    Naive(NaiveDateTime),
    /// A specific instant.
    Aware(DateTime<FixedOffset>),
}

impl From<NaiveDate> for DateBound {
    fn from(date: NaiveDate) -> Self {
        DateBound::Date(date)
    }
}

impl From<NaiveDateTime> for DateBound {
    fn from(naive: NaiveDateTime) -> Self {
        DateBound::Naive(naive)
    }
}

impl<T: TimeZone> From<DateTime<T>> for DateBound {
    fn from(dt: DateTime<T>) -> Self {
        DateBound::Aware(dt.fixed_offset())
    }
}

/// Which end of a window a boundary sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

impl DateBound {
    /// Resolve this boundary to an instant in `tz`.
    pub fn resolve(self, edge: Edge, tz: Tz) -> LvResult<DateTime<Tz>> {
        match self {
            DateBound::Date(date) => {
                let naive = match edge {
                    Edge::Start => date.and_hms_opt(0, 0, 0),
                    Edge::End => date.and_hms_opt(23, 59, 59),
                }
                .ok_or_else(|| LvError::InvalidArgument(format!("invalid date {date}")))?;
                localize(naive, tz)
            }
            DateBound::Naive(naive) => localize(naive, tz),
            DateBound::Aware(dt) => Ok(dt.with_timezone(&tz)),
        }
    }
}

/// Attach `tz` to a wall-clock time without shifting it.
///
/// Times repeated by a DST fold take the earlier instant; times skipped by a
/// DST gap do not exist and are rejected.
fn localize(naive: NaiveDateTime, tz: Tz) -> LvResult<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(LvError::InvalidArgument(format!(
            "{naive} does not exist in timezone {tz}"
        ))),
    }
}

/// A normalized (start, end) pair in the subject timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    /// Normalize caller-supplied boundaries into `tz`.
    pub fn normalize(
        start: impl Into<DateBound>,
        end: impl Into<DateBound>,
        tz: Tz,
    ) -> LvResult<Self> {
        let start = start.into().resolve(Edge::Start, tz)?;
        let end = end.into().resolve(Edge::End, tz)?;
        Self::from_instants(start, end)
    }

    /// Build a window from resolved instants, checking their order.
    pub fn from_instants(start: DateTime<Tz>, end: DateTime<Tz>) -> LvResult<Self> {
        if start > end {
            return Err(LvError::InvalidArgument(format!(
                "time window starts after it ends ({} > {})",
                format_wire(&start),
                format_wire(&end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// `from` / `till` query parameters.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("from", format_wire(&self.start)),
            ("till", format_wire(&self.end)),
        ]
    }
}

/// Serialize an instant in the wire format, e.g. `2023-04-01T00:00:00+0200`.
pub fn format_wire(dt: &DateTime<Tz>) -> String {
    dt.format(WIRE_DATETIME_FORMAT).to_string()
}
