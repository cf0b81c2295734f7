use reqwest::{Client, StatusCode};
use serde::Deserialize;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use crate::domain::{FuelShare, GenerationInterval};

pub const DEFAULT_BASE_URL: &str = "https://api.carbonintensity.org.uk/generation/";

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
}

impl UpstreamError {
    /// Whether repeating the same request may succeed.
    ///
    /// Builder, redirect and decode failures repeat identically and are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            Self::Status(status) => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            Self::Payload(_) | Self::Timestamp { .. } | Self::Format(_) => false,
        }
    }
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Option<Vec<IncomingInterval>>,
}

#[derive(Deserialize)]
struct IncomingInterval {
    from: String,
    to: String,
    #[serde(rename = "generationmix", default)]
    generation_mix: Vec<IncomingFuelShare>,
}

#[derive(Deserialize)]
struct IncomingFuelShare {
    fuel: String,
    perc: f64,
}

impl TryFrom<IncomingInterval> for GenerationInterval {
    type Error = UpstreamError;

    fn try_from(i: IncomingInterval) -> Result<Self, Self::Error> {
        Ok(GenerationInterval {
            from: parse_timestamp(&i.from)?,
            to: parse_timestamp(&i.to)?,
            mix: i
                .generation_mix
                .into_iter()
                .map(|share| FuelShare::new(share.fuel, share.perc))
                .collect(),
        })
    }
}

/// Upstream emits minute precision (`2024-03-10T00:30Z`); recorded files may carry full RFC 3339.
fn parse_timestamp(value: &str) -> Result<OffsetDateTime, UpstreamError> {
    PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]Z"))
        .map(PrimitiveDateTime::assume_utc)
        .or_else(|_| OffsetDateTime::parse(value, &Rfc3339))
        .map_err(|source| UpstreamError::Timestamp {
            value: value.to_string(),
            source,
        })
}

fn format_timestamp(ts: OffsetDateTime) -> Result<String, UpstreamError> {
    Ok(ts
        .to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]Z"))?)
}

/// Build the `{base_url}/{from}/{to}` request URL.
pub fn endpoint(base_url: &str, from: OffsetDateTime, to: OffsetDateTime) -> Result<String, UpstreamError> {
    Ok(format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        format_timestamp(from)?,
        format_timestamp(to)?
    ))
}

/// Decode a `generation` response body. A null or missing `data` array yields no intervals.
pub fn parse_generation_response(body: &str) -> Result<Vec<GenerationInterval>, UpstreamError> {
    let response: GenerationResponse = serde_json::from_str(body)?;
    response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(GenerationInterval::try_from)
        .collect()
}

/// Fetch the generation mix intervals covering `[from, to)`.
pub async fn generation_mix(
    client: &Client,
    base_url: &str,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<Vec<GenerationInterval>, UpstreamError> {
    let url = endpoint(base_url, from, to)?;

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status));
    }

    let body = response.text().await?;
    parse_generation_response(&body)
}
