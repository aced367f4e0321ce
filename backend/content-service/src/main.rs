use actix_cors::Cors;
use actix_middleware::MetricsMiddleware;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use content_service::db::{FeedStore, PgFeedStore, MIGRATOR};
use content_service::{AppServices, Config};
use resilience::TimeoutConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        cors = cors.allowed_origin(origin);
    }
    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting on Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Content Service
///
/// # Routes
///
/// - `POST /api/users/register`, `GET /api/me`
/// - `POST /api/posts`, `GET /api/posts?q&cursor&limit`
/// - `POST /api/posts/{id}/like`, `POST /api/posts/{id}/comments`
/// - `GET /api/notifications/ws`
/// - `GET /api/health`, `GET /api/health/ready`, `GET /metrics`
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(env = %config.app.env, "configuration loaded");

    let store_timeout = TimeoutConfig::from_millis(config.timeouts.store_timeout_ms);
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(store_timeout.duration)
        .connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;
    tracing::info!("database pool ready");

    MIGRATOR
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("database migrations applied");

    let store: Arc<dyn FeedStore> = Arc::new(PgFeedStore::new(pool.clone()));
    let services = AppServices::with_hub(config.clone(), store)
        .context("failed to initialise token service")?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(build_cors(&allowed_origins))
            .wrap(MetricsMiddleware)
            .wrap(TracingLogger::default())
            .configure(|cfg| services.configure(cfg))
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {bind_address}"))?
    .disable_signals()
    .run();

    let handle = server.handle();
    let mut server_task = actix_web::rt::spawn(server);

    tokio::select! {
        joined = &mut server_task => {
            tracing::error!("HTTP server exited before shutdown was requested");
            joined.context("HTTP server task failed")?.context("HTTP server error")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            handle.stop(true).await;
            server_task
                .await
                .context("HTTP server task failed")?
                .context("HTTP server error")?;
        }
    }

    pool.close().await;
    tracing::info!("Content-service shutting down");
    Ok(())
}
