use serde::Serialize;
use time::OffsetDateTime;

/// Percentage contribution of a single fuel to the generation mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelShare {
    pub fuel: String,
    pub perc: f64,
}

impl FuelShare {
    pub fn new(fuel: impl Into<String>, perc: f64) -> Self {
        Self {
            fuel: fuel.into(),
            perc,
        }
    }
}

/// A half-hour slice of the national generation mix, `[from, to)`.
///
/// Percentages are reported as-is and are not guaranteed to sum to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInterval {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
    pub mix: Vec<FuelShare>,
}
