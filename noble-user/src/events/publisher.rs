use uuid::Uuid;

use noble_shared::clients::rabbitmq::RabbitMQClient;
use noble_shared::types::event::{payloads, routing_keys, Event};

pub async fn publish_profile_updated(rabbitmq: &RabbitMQClient, profile_id: Uuid, credential_id: Uuid) {
    let event = Event::new(
        "noble-user",
        routing_keys::USER_PROFILE_UPDATED,
        payloads::ProfileUpdated {
            profile_id,
            credential_id,
        },
    )
    .with_user(credential_id);

    if let Err(e) = rabbitmq.publish(routing_keys::USER_PROFILE_UPDATED, &event).await {
        tracing::error!(error = %e, "failed to publish profile.updated event");
    }
}

pub async fn publish_onboarding_completed(rabbitmq: &RabbitMQClient, credential_id: Uuid, display_name: &str) {
    let event = Event::new(
        "noble-user",
        routing_keys::USER_ONBOARDING_COMPLETED,
        payloads::OnboardingCompleted {
            credential_id,
            display_name: display_name.to_string(),
        },
    )
    .with_user(credential_id);

    if let Err(e) = rabbitmq.publish(routing_keys::USER_ONBOARDING_COMPLETED, &event).await {
        tracing::error!(error = %e, "failed to publish onboarding.completed event");
    }
}
