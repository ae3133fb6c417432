use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::PgCallRecordRepository;
use application::CallReportService;
use callreport::{PayloadReducer, TimeNormalizer};
use config::AppConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub call_service: Arc<CallReportService>,
    /// `None` disables the webhook secret check
    pub webhook_secret: Option<Arc<str>>,
    /// Listing window used when neither date bound is given
    pub default_window: chrono::Duration,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble every route, the docs and the shared layers
pub fn build_router(state: AppState) -> Router {
    // Only the ingestion route is guarded by the shared secret
    let webhook_routes = routes::webhook::router().route_layer(
        middleware::from_fn_with_state(state.clone(), auth::webhook_secret_middleware),
    );

    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(webhook_routes)
        .merge(routes::calls::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("🛑 Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "callreport_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("📞 Call report API initializing...");

    let config = AppConfig::from_env().context("Invalid configuration")?;

    if config.webhook_secret.is_some() {
        tracing::info!("🔐 Webhook secret check enabled");
    } else {
        tracing::warn!("⚠️  No WEBHOOK_SECRET set - webhook secret check disabled");
    }

    let pool = adapters::postgres::connect(&config.database_url, &config.pool)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        "🗄️  Database pool ready ({} steady, {} max)",
        config.pool.size,
        config.pool.max_connections()
    );

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("✅ Database migrations completed");

    // Initialize application services
    let normalizer = TimeNormalizer::new(config.display_zone);
    let call_repo = Arc::new(
        PgCallRecordRepository::new(pool.clone(), normalizer)
            .with_statement_timeout(config.pool.statement_timeout),
    );
    let call_service = Arc::new(CallReportService::new(
        call_repo,
        PayloadReducer::new(normalizer),
    ));

    tracing::info!("🕒 Display timezone: {}", config.display_zone);

    let state = AppState {
        call_service,
        webhook_secret: config.webhook_secret.as_deref().map(Arc::from),
        default_window: chrono::Duration::days(config.default_window_days),
    };

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Call report API listening on {}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("👋 Database pool closed");

    Ok(())
}
