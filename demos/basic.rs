//! Basic usage of the expiring cache.
//!
//! Run with `RUST_LOG=expiring_cache=debug` to watch sweeps and rejections.

use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expiring_cache::{Cache, CacheConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expiring_cache=info,basic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Small limit so the oversized write below is refused
    let config = CacheConfig {
        size_limit: 256,
        ..CacheConfig::from_env()
    };
    info!(
        "Configuration loaded: sweep_interval={:?}, size_limit={}",
        config.sweep_interval, config.size_limit
    );

    let cache: Cache<String> = Cache::from_config(&config)?;

    cache.set("session", "short lived".to_string(), Duration::from_millis(500)).await;
    cache.set("profile", "long lived".to_string(), Duration::from_secs(60)).await;
    info!("Stored 2 entries, {} bytes", cache.current_size().await);

    let huge = "x".repeat(config.size_limit as usize);
    if let Err(err) = cache.try_set("huge", huge, Duration::from_secs(60)).await {
        info!("Admission refused: {}", err);
    }

    tokio::time::sleep(cache.sweep_interval() * 2).await;

    info!("session after sweep: {:?}", cache.get("session").await);
    info!("profile after sweep: {:?}", cache.get("profile").await);
    info!("Stats: {:?}", cache.stats().await);

    cache.close().await?;
    Ok(())
}
