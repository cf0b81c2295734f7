//! In-memory interval sources for unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use mix_client::domain::{FuelShare, GenerationInterval};
use time::{Duration, OffsetDateTime};

use crate::analytics::{IntervalSource, MixError};

/// Half-hour interval starting at `from` with the given `(fuel, perc)` shares.
pub fn interval_at(from: OffsetDateTime, mix: &[(&str, f64)]) -> GenerationInterval {
    GenerationInterval {
        from,
        to: from + Duration::minutes(30),
        mix: mix
            .iter()
            .map(|&(fuel, perc)| FuelShare::new(fuel, perc))
            .collect(),
    }
}

/// Serves a fixed set of intervals, filtered to the requested range like the upstream does.
pub struct StaticSource {
    intervals: Vec<GenerationInterval>,
    fetches: AtomicUsize,
    last_range: Mutex<Option<(OffsetDateTime, OffsetDateTime)>>,
}

impl StaticSource {
    pub fn new(intervals: Vec<GenerationInterval>) -> Self {
        Self {
            intervals,
            fetches: AtomicUsize::new(0),
            last_range: Mutex::new(None),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn last_range(&self) -> Option<(OffsetDateTime, OffsetDateTime)> {
        *self.last_range.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl IntervalSource for StaticSource {
    async fn fetch(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<GenerationInterval>, MixError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_range.lock().unwrap() = Some((from, to));

        Ok(self
            .intervals
            .iter()
            .filter(|interval| interval.from >= from && interval.from < to)
            .cloned()
            .collect())
    }
}

/// Always fails as if the upstream were down.
pub struct FailingSource;

#[async_trait::async_trait]
impl IntervalSource for FailingSource {
    async fn fetch(
        &self,
        _from: OffsetDateTime,
        _to: OffsetDateTime,
    ) -> Result<Vec<GenerationInterval>, MixError> {
        Err(MixError::DataUnavailable("upstream returned status 502 Bad Gateway".to_string()))
    }
}
