use anyhow::Result;
use mix_service::{
    api,
    config::AppConfig,
    metrics_server,
    observability,
    sources::CarbonIntensitySource,
    MixService,
};
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let source = CarbonIntensitySource::from_config(&cfg.upstream)?;
    let service = MixService::new(Arc::new(source));

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %cfg.upstream.base_url, "mix service listening");

    axum::serve(listener, api::router(service)).await?;

    Ok(())
}
