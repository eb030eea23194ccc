use uuid::Uuid;

use noble_shared::clients::rabbitmq::RabbitMQClient;
use noble_shared::types::event::{payloads, routing_keys, Event};

pub async fn publish_user_verified(rabbitmq: &RabbitMQClient, credential_id: Uuid, phone_number: &str) {
    let event = Event::new(
        "noble-auth",
        routing_keys::AUTH_USER_VERIFIED,
        payloads::UserVerified {
            credential_id,
            phone_number: phone_number.to_string(),
        },
    )
    .with_user(credential_id);

    if let Err(e) = rabbitmq.publish(routing_keys::AUTH_USER_VERIFIED, &event).await {
        tracing::error!(error = %e, "failed to publish user.verified event");
    }
}
