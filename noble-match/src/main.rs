use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod feed;
mod matching;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use feed::ConversationFeed;
use noble_shared::clients::db::{create_pool, DbPool};
use noble_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub http_client: reqwest::Client,
    pub feed: ConversationFeed,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    noble_shared::middleware::init_tracing("noble-match");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url, 10)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let metrics_handle = noble_shared::middleware::init_metrics();

    let state = Arc::new(AppState {
        db,
        config,
        rabbitmq,
        http_client,
        feed: ConversationFeed::new(),
        metrics_handle,
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/swipes", post(routes::swipes::record_swipe))
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/:id/seen", post(routes::matches::mark_match_seen))
        .route("/likes", get(routes::likes::list_likes))
        .route("/likes/read", post(routes::likes::mark_likes_read))
        .route("/conversations", get(routes::conversations::list_conversations))
        .route(
            "/conversations/:id/messages",
            get(routes::messages::list_messages).post(routes::messages::send_message),
        )
        .route("/conversations/:id/read", post(routes::messages::mark_read))
        .route("/conversations/:id/feed", get(routes::feed::conversation_feed))
        .layer(axum::middleware::from_fn(noble_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "noble-match starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
