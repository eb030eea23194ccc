use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;
use std::sync::Arc;

use noble_shared::types::event::{payloads, routing_keys, Event};

use crate::services::profile_service;
use crate::AppState;

/// Listen for auth.user.verified events to create default profiles
pub async fn listen_user_verified(state: Arc<AppState>) -> anyhow::Result<()> {
    let consumer = state.rabbitmq.subscribe(
        "noble-user.auth.user.verified",
        &[routing_keys::AUTH_USER_VERIFIED],
    ).await?;

    tracing::info!("listening for auth.user.verified events");

    let mut consumer = consumer;
    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::UserVerified>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(
                            credential_id = %data.credential_id,
                            "received user.verified event"
                        );

                        if let Err(e) = profile_service::create_default_profile(
                            &state.db,
                            data.credential_id,
                        ) {
                            tracing::error!(
                                error = %e,
                                credential_id = %data.credential_id,
                                "failed to create default profile"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize user.verified event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "consumer error");
            }
        }
    }

    Ok(())
}
