//! Window sizes and day-boundary policy injected into the feed services.

use chrono::{FixedOffset, Offset, Utc};

use super::Error;

/// Default trailing window for the feed, in calendar days including today.
pub const DEFAULT_FEED_WINDOW_DAYS: u32 = 3;
/// Default length of the sleep series, in calendar days including today.
pub const DEFAULT_SERIES_DAYS: u32 = 7;

/// Explicit configuration shared by feed, correlation and series services.
///
/// # Examples
/// ```
/// use chrono::FixedOffset;
/// use fitfeed::domain::FeedSettings;
///
/// let settings = FeedSettings::new(3, 7, FixedOffset::east_opt(0).expect("utc"))
///     .expect("valid settings");
/// assert_eq!(settings.feed_window_days(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    feed_window_days: u32,
    series_days: u32,
    day_offset: FixedOffset,
}

impl FeedSettings {
    /// Validate and construct settings. Both spans must be at least one day.
    pub fn new(feed_window_days: u32, series_days: u32, day_offset: FixedOffset) -> Result<Self, Error> {
        if feed_window_days == 0 {
            return Err(Error::invalid_request("feed window must span at least one day"));
        }
        if series_days == 0 {
            return Err(Error::invalid_request("sleep series must span at least one day"));
        }
        Ok(Self {
            feed_window_days,
            series_days,
            day_offset,
        })
    }

    /// Build settings from an offset expressed in minutes east of UTC.
    pub fn with_offset_minutes(
        feed_window_days: u32,
        series_days: u32,
        offset_minutes: i32,
    ) -> Result<Self, Error> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::invalid_request(format!("day offset {offset_minutes} minutes is out of range"))
            })?;
        Self::new(feed_window_days, series_days, offset)
    }

    /// Trailing feed window in calendar days.
    pub fn feed_window_days(&self) -> u32 {
        self.feed_window_days
    }

    /// Sleep series length in calendar days.
    pub fn series_days(&self) -> u32 {
        self.series_days
    }

    /// Offset used to decide where a calendar day starts.
    pub fn day_offset(&self) -> FixedOffset {
        self.day_offset
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            feed_window_days: DEFAULT_FEED_WINDOW_DAYS,
            series_days: DEFAULT_SERIES_DAYS,
            day_offset: Utc.fix(),
        }
    }
}
