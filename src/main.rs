use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use order_service::application::services::resilience::CallPolicy;
use order_service::bootstrap::app_context::{AppContext, AppServices};
use order_service::bootstrap::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "order_service=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting order service");

    // Database
    let pool = order_service::infrastructure::db::connect_pool(&cfg).await?;
    order_service::infrastructure::db::migrate(&pool).await?;

    let order_repo = Arc::new(
        order_service::infrastructure::db::repositories::order_repository_sqlx::SqlxOrderRepository::new(
            pool.clone(),
        ),
    );
    let book_client = Arc::new(
        order_service::infrastructure::catalog::book_client_reqwest::ReqwestBookClient::new(
            &cfg.catalog.service_uri,
        ),
    );
    let catalog_policy = CallPolicy::from(&cfg.catalog);
    info!(catalog = %cfg.catalog.service_uri, ?catalog_policy, "catalog_client_configured");

    let services = AppServices::new(order_repo, book_client, catalog_policy);
    let ctx = AppContext::new(cfg.clone(), services);

    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::OPTIONS,
    ];
    let cors = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers([http::header::CONTENT_TYPE]),
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
            .allow_methods(methods)
            .allow_headers([http::header::CONTENT_TYPE]),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers([http::header::CONTENT_TYPE]),
    };

    let app = order_service::presentation::http::router(ctx).layer(cors);

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
    }
}
