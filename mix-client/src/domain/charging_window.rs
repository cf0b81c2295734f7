use serde::Serialize;
use time::OffsetDateTime;

/// Contiguous run of intervals with the highest average clean-energy share.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalChargingWindow {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub average_clean_energy_percentage: f64,
}
