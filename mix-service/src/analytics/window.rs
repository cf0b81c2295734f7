use mix_client::domain::{GenerationInterval, OptimalChargingWindow};

use super::MixError;
use crate::transform::{clean_sum, round2};

/// Native resolution of the upstream feed: half-hour intervals.
pub const INTERVALS_PER_HOUR: usize = 2;

pub const MIN_WINDOW_HOURS: u32 = 1;
pub const MAX_WINDOW_HOURS: u32 = 6;

/// Charging window length in whole hours, within `MIN_WINDOW_HOURS..=MAX_WINDOW_HOURS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHours(u32);

impl WindowHours {
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Number of consecutive intervals spanned by the window.
    pub const fn intervals(self) -> usize {
        self.0 as usize * INTERVALS_PER_HOUR
    }
}

impl TryFrom<i64> for WindowHours {
    type Error = MixError;

    fn try_from(hours: i64) -> Result<Self, Self::Error> {
        match u32::try_from(hours) {
            Ok(h) if (MIN_WINDOW_HOURS..=MAX_WINDOW_HOURS).contains(&h) => Ok(Self(h)),
            _ => Err(MixError::WindowOutOfRange(hours)),
        }
    }
}

/// Slide a window of `intervals_in_window` consecutive intervals over the
/// time-ordered `intervals` and return the one with the highest average
/// per-interval clean sum.
///
/// Ties keep the earliest window. `None` when no full window fits.
pub fn best_window(
    intervals: &[GenerationInterval],
    intervals_in_window: usize,
) -> Option<OptimalChargingWindow> {
    if intervals_in_window == 0 || intervals.len() < intervals_in_window {
        return None;
    }

    let clean_sums: Vec<f64> = intervals
        .iter()
        .map(|interval| clean_sum(&interval.mix))
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (start, window) in clean_sums.windows(intervals_in_window).enumerate() {
        let score = window.iter().sum::<f64>() / window.len() as f64;
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((start, score));
        }
    }

    let (start, score) = best?;
    let last = start + intervals_in_window - 1;

    Some(OptimalChargingWindow {
        start: intervals[start].from,
        end: intervals[last].to,
        average_clean_energy_percentage: round2(score),
    })
}
