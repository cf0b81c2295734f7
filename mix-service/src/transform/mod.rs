use mix_client::domain::{FuelShare, GenerationInterval};
use time::{Date, UtcOffset};

/// Fuels counted as low-carbon generation. Matched case-insensitively.
pub const CLEAN_SOURCES: [&str; 5] = ["wind", "solar", "hydro", "nuclear", "biomass"];

pub fn is_clean(fuel: &str) -> bool {
    CLEAN_SOURCES
        .iter()
        .any(|clean| clean.eq_ignore_ascii_case(fuel))
}

/// Sum of the clean fuel percentages within one mix.
pub fn clean_sum<'a, I>(mix: I) -> f64
where
    I: IntoIterator<Item = &'a FuelShare>,
{
    mix.into_iter()
        .filter(|share| is_clean(&share.fuel))
        .map(|share| share.perc)
        .sum()
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Intervals whose start falls on `date` (UTC calendar), in input order.
pub fn starting_on(intervals: &[GenerationInterval], date: Date) -> Vec<&GenerationInterval> {
    intervals
        .iter()
        .filter(|interval| interval.from.to_offset(UtcOffset::UTC).date() == date)
        .collect()
}
