use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turnover_backend::config::TurnoverConfig;
use turnover_backend::services::asn_ingestion::TurnoverService;
use turnover_backend::services::turnover_store::SeaOrmTurnoverStore;
use turnover_backend::{app, AppState};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,turnover_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Reject bad configuration before touching the database
    let config = TurnoverConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid turnover configuration");
        e
    })?;

    tracing::info!(
        minimum_data_points = config.minimum_data_points,
        history_maximum = config.history_maximum,
        use_median = config.use_median,
        "Loaded turnover configuration"
    );

    // Connect to database
    let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    let store = Arc::new(SeaOrmTurnoverStore::new(db));
    let turnover = Arc::new(TurnoverService::new(store.clone(), store, config));

    let state = AppState { turnover };

    // Start server
    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
