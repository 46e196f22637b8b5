use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database::init_db;
use server::registry::{NhtsaRegistry, VehicleRegistry};
use server::state::AppState;
use server::{build_router, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    seed::ensure_indexes(&db).await?;
    if config.seed.sample_data {
        seed::seed_sample_data(&db)
            .await
            .context("Failed to seed sample data")?;
    }

    let registry: Option<Arc<dyn VehicleRegistry>> = if config.registry.enabled {
        let client = NhtsaRegistry::new(&config.registry).context("Invalid registry config")?;
        info!(base_url = %config.registry.base_url, "Vehicle registry enabled");
        Some(Arc::new(client))
    } else {
        info!("Vehicle registry disabled; new VINs are cached from structural decode only");
        None
    };

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = AppState {
        db,
        config: Arc::new(config),
        registry,
    };
    let app = build_router(state);

    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
