//! FarmLink Platform - Backend Server
//!
//! Farmland records, crop recommendation, weather, irrigation reminders and a
//! discussion board for farmers.

use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmlink_backend::cache::{init_redis, CacheStore, MemoryCacheStore, RedisCacheStore};
use farmlink_backend::config::{CacheBackend, Config};
use farmlink_backend::external::{
    CropAdvisor, LogSmsSender, MockCropAdvisor, OpenAiClient, OpenWeatherClient, SmsSender,
    TwilioClient,
};
use farmlink_backend::{create_app, jobs, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farmlink_server=debug,farmlink_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting FarmLink Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let cache: Arc<dyn CacheStore> = match config.cache.backend {
        CacheBackend::Memory => {
            tracing::info!("Using in-process cache");
            Arc::new(MemoryCacheStore::new())
        }
        CacheBackend::Redis => {
            let connection = init_redis(&config.cache.redis_url).await?;
            Arc::new(RedisCacheStore::new(connection))
        }
    };

    let advisor: Arc<dyn CropAdvisor> = if config.openai.mock {
        tracing::warn!("OpenAI mock mode enabled, serving canned recommendations");
        Arc::new(MockCropAdvisor)
    } else {
        Arc::new(OpenAiClient::new(&config.openai)?)
    };

    let sms: Arc<dyn SmsSender> = if config.sms.enabled {
        Arc::new(TwilioClient::new(&config.sms)?)
    } else {
        tracing::warn!("SMS disabled, irrigation reminders will only be logged");
        Arc::new(LogSmsSender)
    };

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        cache,
        weather: Arc::new(OpenWeatherClient::new(&config.weather)?),
        advisor,
        sms,
    };

    if config.irrigation.reminders_enabled {
        jobs::spawn_irrigation_reminders(state.clone());
    }

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
