//! Generation-mix analytics: per-day average mixes and the cleanest charging window.
//!
//! Each call fetches its horizon from the [`IntervalSource`] exactly once and
//! computes on the materialised intervals. Nothing is cached between calls.

mod daily;
mod window;

use std::sync::Arc;

use mix_client::domain::{DailyMix, GenerationInterval, OptimalChargingWindow};
use time::{Date, Duration, OffsetDateTime};

pub use daily::{daily_averages, daily_mix};
pub use window::{best_window, WindowHours, INTERVALS_PER_HOUR, MAX_WINDOW_HOURS, MIN_WINDOW_HOURS};

/// Days covered by the daily averages, starting today.
pub const DAYS_FOR_DAILY_AVERAGES: u8 = 3;

/// Lookahead horizon for the charging window search, starting today.
pub const DAYS_FOR_CHARGING_WINDOW: u8 = 2;

#[derive(thiserror::Error, Debug)]
pub enum MixError {
    #[error("generation mix data unavailable: {0}")]
    DataUnavailable(String),
    #[error("window of {0} hours is outside 1..=6")]
    WindowOutOfRange(i64),
}

/// Supplier of generation-mix intervals for a time range.
#[async_trait::async_trait]
pub trait IntervalSource: Send + Sync {
    /// Intervals covering `[from, to)`. Order is not guaranteed.
    async fn fetch(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<GenerationInterval>, MixError>;
}

#[derive(Clone)]
pub struct MixService {
    source: Arc<dyn IntervalSource>,
}

impl MixService {
    pub fn new(source: Arc<dyn IntervalSource>) -> Self {
        Self { source }
    }

    /// Average mix for today and the following two days.
    pub async fn three_day_averages(&self) -> Result<Vec<DailyMix>, MixError> {
        self.three_day_averages_from(today()).await
    }

    pub async fn three_day_averages_from(&self, today: Date) -> Result<Vec<DailyMix>, MixError> {
        let (from, to) = day_span(today, DAYS_FOR_DAILY_AVERAGES);
        let intervals = self.source.fetch(from, to).await?;

        let days = daily_averages(&intervals, today, DAYS_FOR_DAILY_AVERAGES);
        tracing::debug!(intervals = intervals.len(), days = days.len(), "computed daily averages");
        Ok(days)
    }

    /// Cleanest window of `window_hours` within today and tomorrow.
    ///
    /// `Ok(None)` when the horizon holds fewer intervals than the window needs.
    pub async fn optimal_charging_window(
        &self,
        window_hours: i64,
    ) -> Result<Option<OptimalChargingWindow>, MixError> {
        self.optimal_charging_window_from(today(), window_hours).await
    }

    pub async fn optimal_charging_window_from(
        &self,
        today: Date,
        window_hours: i64,
    ) -> Result<Option<OptimalChargingWindow>, MixError> {
        let hours = WindowHours::try_from(window_hours)?;

        let (from, to) = day_span(today, DAYS_FOR_CHARGING_WINDOW);
        let mut intervals = self.source.fetch(from, to).await?;
        intervals.sort_by_key(|interval| interval.from);

        let window = best_window(&intervals, hours.intervals());
        tracing::debug!(
            intervals = intervals.len(),
            window_hours = hours.get(),
            found = window.is_some(),
            "searched charging window"
        );
        Ok(window)
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// UTC midnights bounding `days` calendar days starting at `first_day`.
fn day_span(first_day: Date, days: u8) -> (OffsetDateTime, OffsetDateTime) {
    let from = first_day.midnight().assume_utc();
    (from, from + Duration::days(i64::from(days)))
}
