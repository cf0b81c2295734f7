use anyhow::{bail, Context, Result};
use mix_service::{
    config::AppConfig,
    observability,
    sources::{CarbonIntensitySource, RecordedFileSource},
    IntervalSource,
    MixService,
};
use std::{env, sync::Arc};
use time::{macros::format_description, Date, OffsetDateTime};

const USAGE: &str = "usage: mix_report <window_hours> [recorded_response.json [start_date]]";

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        bail!(USAGE);
    }
    let window_hours: i64 = args[1]
        .parse()
        .with_context(|| format!("window_hours must be an integer, got '{}'", args[1]))?;

    let start_date = match args.get(3) {
        Some(raw) => Some(
            Date::parse(raw, format_description!("[year]-[month]-[day]"))
                .with_context(|| format!("start_date must be YYYY-MM-DD, got '{raw}'"))?,
        ),
        None => None,
    };

    // A recording is replayed from its own first day unless a start date is given;
    // the live API always starts today.
    let (source, first_day): (Arc<dyn IntervalSource>, Date) = match args.get(2) {
        Some(path) => {
            let recorded = RecordedFileSource::new(path);
            let first_day = match start_date {
                Some(date) => date,
                None => recorded
                    .first_day()
                    .await?
                    .with_context(|| format!("{path} holds no intervals"))?,
            };
            (Arc::new(recorded), first_day)
        }
        None => {
            let cfg = AppConfig::load()?;
            let source = CarbonIntensitySource::from_config(&cfg.upstream)?;
            (Arc::new(source), OffsetDateTime::now_utc().date())
        }
    };
    let service = MixService::new(source);

    let (days, window) = futures::try_join!(
        service.three_day_averages_from(first_day),
        service.optimal_charging_window_from(first_day, window_hours),
    )?;

    tracing::info!(
        %first_day,
        days = days.len(),
        window_found = window.is_some(),
        window_hours,
        "mix report computed"
    );

    let report = serde_json::json!({
        "firstDay": first_day.to_string(),
        "threeDayAverages": days,
        "optimalChargingWindow": window,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
