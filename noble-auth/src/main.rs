use axum::{routing::{get, post}, Router};
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
use noble_shared::clients::rabbitmq::RabbitMQClient;
use noble_shared::clients::redis::RedisClient;
use noble_shared::clients::sms::SmsClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub redis: RedisClient,
    pub sms: SmsClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    noble_shared::middleware::init_tracing("noble-auth");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url, 10)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let redis = RedisClient::connect(&config.redis_url).await?;
    let sms = SmsClient::new(&config.sms_gateway_url, &config.sms_api_key, &config.sms_sender);

    let state = Arc::new(AppState { db, config, rabbitmq, redis, sms });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/request-code", post(routes::request_code::request_code))
        .route("/verify-code", post(routes::verify_code::verify_code))
        .route("/refresh", post(routes::refresh::refresh_token))
        .route("/logout", post(routes::logout::logout))
        .route("/me", get(routes::me::me))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "noble-auth starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
