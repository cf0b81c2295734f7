use std::collections::HashMap;

use mix_client::domain::{DailyMix, FuelShare, GenerationInterval};
use time::{Date, Duration};

use crate::transform::{clean_sum, round2, starting_on};

/// Average mix for each of `days` calendar days starting at `first_day`, ascending by date.
///
/// Days without any interval starting on them are left out.
pub fn daily_averages(intervals: &[GenerationInterval], first_day: Date, days: u8) -> Vec<DailyMix> {
    let mut result: Vec<DailyMix> = (0..days)
        .filter_map(|offset| first_day.checked_add(Duration::days(i64::from(offset))))
        .filter_map(|date| daily_mix(intervals, date))
        .collect();

    result.sort_by_key(|day| day.date);
    result
}

/// Average mix of the intervals starting on `date`, or `None` when there are none.
///
/// Each fuel is averaged over the intervals that report it, rounded to two
/// decimals. The clean-energy percentage is the rounded sum of the already
/// rounded clean averages.
pub fn daily_mix(intervals: &[GenerationInterval], date: Date) -> Option<DailyMix> {
    let day = starting_on(intervals, date);
    if day.is_empty() {
        return None;
    }

    let average_mix = average_by_fuel(day.into_iter().flat_map(|interval| interval.mix.iter()));
    let clean_energy_percentage = round2(clean_sum(&average_mix));

    Some(DailyMix {
        date,
        average_mix,
        clean_energy_percentage,
    })
}

/// Per-fuel arithmetic mean, in order of first appearance.
fn average_by_fuel<'a>(shares: impl Iterator<Item = &'a FuelShare>) -> Vec<FuelShare> {
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, f64, u32)> = Vec::new();

    for share in shares {
        match positions.get(share.fuel.as_str()) {
            Some(&idx) => {
                let (_, total, count) = &mut groups[idx];
                *total += share.perc;
                *count += 1;
            }
            None => {
                positions.insert(share.fuel.as_str(), groups.len());
                groups.push((share.fuel.as_str(), share.perc, 1));
            }
        }
    }

    groups
        .into_iter()
        .map(|(fuel, total, count)| FuelShare::new(fuel, round2(total / f64::from(count))))
        .collect()
}
