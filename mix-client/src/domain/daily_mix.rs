use serde::Serialize;
use time::Date;

use super::FuelShare;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Average generation mix of a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMix {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub average_mix: Vec<FuelShare>,
    pub clean_energy_percentage: f64,
}
