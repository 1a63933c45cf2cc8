// Item service HTTP server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, Router};
use http::{header, Method};
use migration::{Migrator, MigratorTrait};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "cache-redis")]
use item_service::cache::CacheManager;
use item_service::config::AppConfig;
use item_service::db::DbPool;
use item_service::handlers::{self, AppContext};
use item_service::health::HealthChecker;
use item_service::metrics;
use item_service::services::item_service::ItemService;

fn load_env() {
    dotenv::dotenv().ok();
}

#[tokio::main]
async fn main() {
    load_env();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load service configuration from environment
    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded");

    // Establish database connection pool
    let db_pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Bring the schema up to date
    Migrator::up(db_pool.get_connection(), None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Migrations applied");

    #[cfg(feature = "cache-redis")]
    let cache = match &config.infra.redis_url {
        Some(url) => match CacheManager::connect(url).await {
            Ok(manager) => {
                tracing::info!("Connected to cache");
                Some(manager)
            }
            Err(e) => {
                tracing::warn!("Cache configured but unreachable at startup: {}", e);
                None
            }
        },
        None => None,
    };

    // Initialize service and health checker state
    let repositories = db_pool.repositories();
    let app_state = Arc::new(AppContext {
        items: ItemService::new(repositories.items.clone()),
        db: db_pool.clone(),
        #[cfg(feature = "cache-redis")]
        cache,
        checker: HealthChecker::with_default_timeout(config.infra.clone()),
    });

    // Configure CORS policy
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::AUTHORIZATION,
        ])
        .max_age(Duration::from_secs(3600));

    // Set up API routes; the metrics middleware is a route layer so it sees
    // the matched route template
    let app = Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route("/ready", get(handlers::health::readiness))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/api/v1/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/api/v1/items/{id}",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route_layer(middleware::from_fn(metrics::track_http))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Parse server address from config
    let addr: SocketAddr = config.listen_addr.parse().expect("Invalid address");

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    tracing::info!("Server stopped, closing database pool");
    if let Err(e) = db_pool.close().await {
        tracing::warn!("Failed to close database pool: {}", e);
    }
}

/// Resolves when SIGINT or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
