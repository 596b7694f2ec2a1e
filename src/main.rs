use std::time::Duration;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio_cms::{
    db::postgres::init_store,
    graceful_shutdown::shutdown_signal,
    limiter::rate_limiter::RateLimiterStore,
    mail::build_mailer,
    middlewares::{auth::AuthMiddleware, rate_limit::RateLimit, security_headers::security_headers},
    routes::{configure_routes, json_config, path_config},
    settings::AppConfig,
    storage::build_storage,
    AppState,
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_DISPOSITION, header::RETRY_AFTER])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }
    origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = init_store(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("database initialisation failed: {e:#}")))?;

    let storage = build_storage(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("storage initialisation failed: {e:#}")))?;
    let mailer = build_mailer(&config);

    let app_state = web::Data::new(AppState::new(&config, pool, storage, mailer));

    let limiter = RateLimiterStore::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    limiter.spawn_eviction();

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "Starting {} v{} on {} ({} environment)",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.env
    );

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config(server_config.json_body_limit))
            .app_data(path_config())
            .wrap(AuthMiddleware)
            .wrap(RateLimit::new(limiter.clone(), server_config.trust_proxy))
            .wrap(NormalizePath::trim())
            .wrap(security_headers(server_config.is_production()))
            .wrap(build_cors(&server_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown complete");
            Ok(())
        },
    }
}
