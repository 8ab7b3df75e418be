use dealer_portal::core::{AppState, Config};
use dealer_portal::create_router;
use dealer_portal::storage::{self, FileStorage, PlaceholderStorage, S3Storage};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    config.print_info();

    let state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
                .connect(database_url)
                .await?;
            info!("Connected to Postgres");

            let (uploads, avatars) = build_storage(&config).await?;
            Arc::new(AppState::with_database(
                pool,
                config.jwt_secret.clone(),
                uploads,
                avatars,
            ))
        }
        None => {
            warn!("DATABASE_URL not set: starting in demo mode with in-memory data");
            Arc::new(AppState::demo(config.jwt_secret.clone()))
        }
    };

    // La dashboard gira su un'origin diversa dal backend
    let app = create_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Dealer portal listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Un bucket per i file dei dealer, uno per gli avatar. Senza credenziali
/// entrambi ripiegano sugli URL placeholder.
async fn build_storage(
    config: &Config,
) -> Result<(Arc<dyn FileStorage>, Arc<dyn FileStorage>), Box<dyn std::error::Error>> {
    if !config.is_storage_configured() {
        warn!("Object storage not configured: uploads will use placeholder URLs");
        return Ok((Arc::new(PlaceholderStorage), Arc::new(PlaceholderStorage)));
    }

    let client = storage::build_client(config).await?;
    let public_base = config
        .storage_public_url
        .clone()
        .or_else(|| config.s3_endpoint_url.clone())
        .unwrap_or_default();

    Ok((
        Arc::new(S3Storage::new(
            client.clone(),
            config.uploads_bucket.clone(),
            public_base.clone(),
        )),
        Arc::new(S3Storage::new(
            client,
            config.avatars_bucket.clone(),
            public_base,
        )),
    ))
}
