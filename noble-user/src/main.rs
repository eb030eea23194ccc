use axum::{routing::{get, post}, Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use noble_shared::clients::db::{create_pool, DbPool};
use noble_shared::clients::minio::MinioClient;
use noble_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub minio: MinioClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    noble_shared::middleware::init_tracing("noble-user");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url, 10)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let minio = MinioClient::new(
        &config.minio_endpoint,
        &config.minio_access_key,
        &config.minio_secret_key,
        &config.minio_bucket,
        &config.minio_public_url,
    )
    .await;

    let state = Arc::new(AppState { db, config, rabbitmq, minio });

    // Spawn RabbitMQ subscriber for user.verified events
    let sub_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_user_verified(sub_state).await {
            tracing::error!(error = %e, "user.verified subscriber failed");
        }
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/me", get(routes::profile::get_profile).patch(routes::profile::update_profile))
        .route("/onboarding", post(routes::profile::complete_onboarding))
        .route("/discover", get(routes::discover::list_candidates))
        .route("/profiles/:id", get(routes::profile::get_public_profile))
        .route("/photo", post(routes::photo::upload_photo).delete(routes::photo::delete_photo))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/profiles/batch", post(routes::internal::batch_profiles))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "noble-user starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
