mod cli;
mod telemetry;

use crate::cli::{StorageBackendArg, CLI};
use clap::Parser;
use snip_core::KvStore;
use snip_gateway::{App, AppState};
use snip_generator::RandomGenerator;
use snip_links::{HttpFetcher, LinkService, Shortener};
use snip_storage::{MemoryKv, RedisKv};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        id_length = config.id_length,
        "starting snip server"
    );

    let generator = RandomGenerator::new(config.id_length)?;
    let fetcher = HttpFetcher::new(Duration::from_secs(config.proxy_timeout_secs))?;

    let shortener = match config.storage {
        StorageBackendArg::InMemory => build_shortener(MemoryKv::new(), generator, fetcher),
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or("redis url is required when storage backend is redis")?;
            let kv = RedisKv::connect(redis_url, config.redis_namespace.as_str()).await?;
            info!(namespace = %kv.namespace(), "redis storage ready");
            build_shortener(kv, generator, fetcher)
        }
    };

    if config.dashboard_access_code.as_deref().is_none_or(str::is_empty) {
        warn!("DASHBOARD_ACCESS_CODE is not set, the dashboard is disabled");
    }

    let state = AppState::builder()
        .shortener(shortener)
        .access_code(config.dashboard_access_code)
        .public_base_url(config.public_base_url)
        .build();

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("snip server stopped");
    Ok(())
}

fn build_shortener<K: KvStore>(
    kv: K,
    generator: RandomGenerator,
    fetcher: HttpFetcher,
) -> Arc<dyn Shortener> {
    Arc::new(LinkService::new(kv, generator, fetcher))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
