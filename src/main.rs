use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pix_checkout::admin::HttpAdminForwarder;
use pix_checkout::config::Config;
use pix_checkout::provider::PixApiClient;
use pix_checkout::store::PostgresOrderStore;
use pix_checkout::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("database migrations completed");

    let provider = PixApiClient::new(
        config.provider_env,
        config.provider_api_key.clone(),
        config.provider_platform_id.clone(),
    );
    tracing::info!(environment = ?config.provider_env, "payment provider client initialized");

    let admin = HttpAdminForwarder::new(config.admin_api_url.clone());

    let state = AppState::new(
        Arc::new(config.clone()),
        Arc::new(PostgresOrderStore::new(pool)),
        Arc::new(provider),
        Arc::new(admin),
    );

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
