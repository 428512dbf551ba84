//! Calendar-day arithmetic for trailing windows.
//!
//! A "day" is a calendar day at a fixed UTC offset supplied by
//! [`FeedSettings`]. Windows are inclusive on both ends; the end of a day is
//! the last representable microsecond before the next midnight, matching
//! PostgreSQL `timestamptz` precision.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use super::Error;

/// Inclusive timestamp range.
///
/// ## Invariants
/// - `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Construct a window, rejecting inverted bounds.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fitfeed::domain::TimeWindow;
    ///
    /// let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2026, 3, 3, 23, 59, 59).unwrap();
    /// let window = TimeWindow::new(start, end).expect("ordered bounds");
    /// assert!(window.contains(start));
    /// assert!(window.contains(end));
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        if start > end {
            return Err(Error::invalid_request(
                "window start must not be after window end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Window covering `days` calendar days ending with the day containing
    /// `now` (inclusive).
    pub fn trailing_days(now: DateTime<Utc>, days: u32, offset: FixedOffset) -> Result<Self, Error> {
        let dates = DayRange::trailing(now, days, offset)?;
        Self::new(
            start_of_day(dates.first, offset)?,
            end_of_day(dates.last, offset)?,
        )
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive upper bound.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Consecutive calendar dates, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl DayRange {
    /// The `days` calendar days ending with the day containing `now`.
    pub fn trailing(now: DateTime<Utc>, days: u32, offset: FixedOffset) -> Result<Self, Error> {
        if days == 0 {
            return Err(Error::internal("trailing window must span at least one day"));
        }
        let last = local_date(now, offset);
        let first = last
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| Error::internal("trailing window underflows the calendar"))?;
        Ok(Self { first, last })
    }

    /// Oldest date in the range.
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Newest date in the range.
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.first.iter_days().take_while({
            let last = self.last;
            move |date| *date <= last
        })
    }

    /// Inclusive timestamp window spanning the whole range.
    pub fn window(&self, offset: FixedOffset) -> Result<TimeWindow, Error> {
        TimeWindow::new(
            start_of_day(self.first, offset)?,
            end_of_day(self.last, offset)?,
        )
    }
}

/// Calendar date of `instant` at `offset`.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// First instant of `date` at `offset`.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>, Error> {
    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::internal(format!("cannot resolve midnight of {date}")))
}

fn end_of_day(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>, Error> {
    let next = date
        .succ_opt()
        .ok_or_else(|| Error::internal(format!("no calendar day after {date}")))?;
    Ok(start_of_day(next, offset)? - TimeDelta::microseconds(1))
}
