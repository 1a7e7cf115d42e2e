use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::repository::PartitionedRepository;
use common::storage::github::GithubAssetStore;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use server::config::AppConfig;
use server::identity::IdentityToolkit;
use server::state::AppState;
use server::store::SeaOrmDocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let assets = GithubAssetStore::new(&config.assets).context("Invalid asset store settings")?;
    let identity = IdentityToolkit::new(&config.identity).context("Invalid identity settings")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let repository = PartitionedRepository::new(Arc::new(SeaOrmDocumentStore::new(db)));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(config, repository, Arc::new(assets), Arc::new(identity));
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
