use std::time::{Duration, Instant};

use mix_client::{api::generation_mix, domain::GenerationInterval};
use reqwest::Client;
use time::OffsetDateTime;

use crate::{
    analytics::{IntervalSource, MixError},
    config::UpstreamConfig,
};

/// Live interval source backed by the Carbon Intensity `generation` endpoint.
///
/// Transient failures are retried with linear backoff; anything left after
/// the last attempt surfaces as `MixError::DataUnavailable`.
#[derive(Clone)]
pub struct CarbonIntensitySource {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl CarbonIntensitySource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> Result<Self, MixError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MixError::DataUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            max_retries,
            retry_backoff,
        })
    }

    pub fn from_config(cfg: &UpstreamConfig) -> Result<Self, MixError> {
        Self::new(
            cfg.base_url.clone(),
            Duration::from_millis(cfg.timeout_ms),
            cfg.max_retries,
            Duration::from_millis(cfg.retry_backoff_ms),
        )
    }
}

#[async_trait::async_trait]
impl IntervalSource for CarbonIntensitySource {
    async fn fetch(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<GenerationInterval>, MixError> {
        let mut attempt: u32 = 0;
        loop {
            let started = Instant::now();
            match generation_mix(&self.client, &self.base_url, from, to).await {
                Ok(intervals) => {
                    metrics::counter!("upstream_fetch_total").increment(1);
                    metrics::histogram!("upstream_fetch_duration_seconds")
                        .record(started.elapsed().as_secs_f64());

                    tracing::debug!(%from, %to, intervals = intervals.len(), "fetched generation mix");
                    return Ok(intervals);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let sleep_for = self.retry_backoff * attempt;
                    metrics::counter!("upstream_fetch_retries_total").increment(1);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        "generation mix fetch failed, retrying with backoff"
                    );
                    tokio::time::sleep(sleep_for).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, %from, %to, "generation mix fetch failed, giving up");
                    metrics::counter!("upstream_fetch_errors_total").increment(1);
                    return Err(MixError::DataUnavailable(e.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{extract::State, http::StatusCode, routing::get, Router};

    use super::*;
    use time::macros::datetime;

    const ONE_INTERVAL: &str = r#"{"data":[
        {"from":"2024-03-10T00:00Z","to":"2024-03-10T00:30Z","generationmix":[{"fuel":"wind","perc":40}]}
    ]}"#;

    /// Upstream stand-in answering with `responses` in order, repeating the last one.
    struct ScriptedUpstream {
        responses: Vec<(StatusCode, &'static str)>,
        hits: AtomicUsize,
    }

    async fn scripted(State(upstream): State<Arc<ScriptedUpstream>>) -> (StatusCode, &'static str) {
        let hit = upstream.hits.fetch_add(1, Ordering::SeqCst);
        upstream.responses[hit.min(upstream.responses.len() - 1)]
    }

    /// Serve the script on an ephemeral loopback port and return its base URL.
    async fn serve(responses: Vec<(StatusCode, &'static str)>) -> (String, Arc<ScriptedUpstream>) {
        let upstream = Arc::new(ScriptedUpstream {
            responses,
            hits: AtomicUsize::new(0),
        });
        let app = Router::new()
            .route("/generation/*range", get(scripted))
            .with_state(upstream.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/generation/"), upstream)
    }

    fn source_for(base_url: String, max_retries: u32) -> CarbonIntensitySource {
        CarbonIntensitySource::new(base_url, Duration::from_secs(5), max_retries, Duration::from_millis(1)).unwrap()
    }

    async fn fetch_day(source: &CarbonIntensitySource) -> Result<Vec<GenerationInterval>, MixError> {
        source
            .fetch(datetime!(2024-03-10 00:00 UTC), datetime!(2024-03-11 00:00 UTC))
            .await
    }

    #[tokio::test]
    async fn unreachable_upstream_is_data_unavailable() {
        // Nothing listens on port 9 of the loopback interface.
        let source = CarbonIntensitySource::new(
            "http://127.0.0.1:9/generation/",
            Duration::from_millis(500),
            1,
            Duration::from_millis(1),
        )
        .unwrap();

        let err = source
            .fetch(datetime!(2024-03-10 00:00 UTC), datetime!(2024-03-12 00:00 UTC))
            .await
            .unwrap_err();

        assert!(matches!(err, MixError::DataUnavailable(_)));
    }

    #[test]
    fn builds_from_config() {
        let cfg = UpstreamConfig {
            max_retries: 5,
            retry_backoff_ms: 250,
            ..UpstreamConfig::default()
        };

        let source = CarbonIntensitySource::from_config(&cfg).unwrap();
        assert_eq!(source.max_retries, 5);
        assert_eq!(source.retry_backoff, Duration::from_millis(250));
        assert_eq!(source.base_url, cfg.base_url);
    }

    #[tokio::test]
    async fn server_errors_are_retried_up_to_max_retries() {
        let (base_url, upstream) = serve(vec![(StatusCode::SERVICE_UNAVAILABLE, "down")]).await;

        let err = fetch_day(&source_for(base_url, 2)).await.unwrap_err();

        assert!(matches!(err, MixError::DataUnavailable(_)));
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rate_limiting_is_retried() {
        let (base_url, upstream) = serve(vec![
            (StatusCode::TOO_MANY_REQUESTS, "slow down"),
            (StatusCode::OK, ONE_INTERVAL),
        ])
        .await;

        let intervals = fetch_day(&source_for(base_url, 1)).await.unwrap();

        assert_eq!(intervals.len(), 1);
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds() {
        let (base_url, upstream) = serve(vec![
            (StatusCode::SERVICE_UNAVAILABLE, "down"),
            (StatusCode::OK, ONE_INTERVAL),
        ])
        .await;

        let intervals = fetch_day(&source_for(base_url, 2)).await.unwrap();

        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].from, datetime!(2024-03-10 00:00 UTC));
        assert_eq!(intervals[0].mix[0].perc, 40.0);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (base_url, upstream) = serve(vec![(StatusCode::NOT_FOUND, "no such range")]).await;

        let err = fetch_day(&source_for(base_url, 2)).await.unwrap_err();

        assert!(matches!(err, MixError::DataUnavailable(_)));
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_not_retried() {
        let (base_url, upstream) = serve(vec![(StatusCode::OK, "<html>maintenance</html>")]).await;

        let err = fetch_day(&source_for(base_url, 2)).await.unwrap_err();

        assert!(matches!(err, MixError::DataUnavailable(_)));
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_base_url_fails_without_retrying() {
        let source = CarbonIntensitySource::new(
            "not a url",
            Duration::from_millis(500),
            3,
            Duration::from_secs(60),
        )
        .unwrap();

        // A retried builder error would sleep a full minute before the second attempt.
        let err = tokio::time::timeout(Duration::from_secs(5), fetch_day(&source))
            .await
            .expect("builder errors return immediately")
            .unwrap_err();

        assert!(matches!(err, MixError::DataUnavailable(_)));
    }
}
