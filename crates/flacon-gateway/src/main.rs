use std::sync::Arc;

use clap::Parser;
use flacon_catalog::CatalogService;
use flacon_core::repository::CatalogRepository;
use flacon_gateway::cli::{StorageBackendArg, CLI};
use flacon_gateway::{App, AppState};
use flacon_shortlink::{RemoteShortLinks, RemoteShortLinksConfig};
use flacon_storage::{InMemoryCatalog, PgCatalogRepository};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            serve(InMemoryCatalog::new(), config).await?;
        }
        StorageBackendArg::Postgres => {
            let dsn = config
                .postgres_dsn
                .clone()
                .ok_or_else(|| anyhow::anyhow!("postgres dsn is required for postgres storage"))?;
            let repository = PgCatalogRepository::connect(&dsn)
                .await
                .map_err(|e| anyhow::anyhow!("failed to connect postgres: {e}"))?;
            serve(repository, config).await?;
        }
    }

    Ok(())
}

async fn serve<R: CatalogRepository>(repository: R, config: CLI) -> anyhow::Result<()> {
    let short_links = RemoteShortLinks::new(
        RemoteShortLinksConfig::builder()
            .base_url(config.shortener_base_url)
            .api_key(config.shortener_api_key)
            .build(),
    )
    .map_err(|e| anyhow::anyhow!("failed to build shortener client: {e}"))?;

    let catalog = CatalogService::new(Arc::new(repository), Arc::new(short_links));
    let state = AppState::new(
        Arc::new(catalog),
        config.auth_key,
        config.short_endpoint_url,
        config.webhook_url,
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state)).await?;
    Ok(())
}
