use std::path::PathBuf;

use mix_client::{api::parse_generation_response, domain::GenerationInterval};
use time::{Date, OffsetDateTime};

use crate::analytics::{IntervalSource, MixError};

/// Replays a saved `generation` response from disk.
///
/// The file holds the upstream JSON body verbatim (`{"data": [...]}`). Each
/// fetch re-reads the file and keeps the intervals starting in `[from, to)`.
pub struct RecordedFileSource {
    path: PathBuf,
}

impl RecordedFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// UTC date of the earliest interval in the recording, `None` when it holds none.
    pub async fn first_day(&self) -> Result<Option<Date>, MixError> {
        let intervals = self.read_intervals().await?;
        Ok(intervals.iter().map(|interval| interval.from).min().map(|from| from.date()))
    }

    async fn read_intervals(&self) -> Result<Vec<GenerationInterval>, MixError> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            MixError::DataUnavailable(format!("failed to read {}: {e}", self.path.display()))
        })?;

        parse_generation_response(&body).map_err(|e| {
            metrics::counter!("recorded_file_parse_errors_total").increment(1);
            MixError::DataUnavailable(format!("failed to parse {}: {e}", self.path.display()))
        })
    }
}

#[async_trait::async_trait]
impl IntervalSource for RecordedFileSource {
    async fn fetch(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<GenerationInterval>, MixError> {
        let intervals = self.read_intervals().await?;

        Ok(intervals
            .into_iter()
            .filter(|interval| interval.from >= from && interval.from < to)
            .collect())
    }
}
