use uuid::Uuid;

use noble_shared::clients::rabbitmq::RabbitMQClient;
use noble_shared::types::event::{payloads, routing_keys, Event};

pub async fn publish_like_received(
    rabbitmq: &RabbitMQClient,
    liker_id: Uuid,
    liked_id: Uuid,
    is_super: bool,
) {
    let event = Event::new(
        "noble-match",
        routing_keys::MATCH_LIKE_RECEIVED,
        payloads::LikeReceived {
            liker_id,
            liked_id,
            is_super,
        },
    )
    .with_user(liked_id);

    if let Err(e) = rabbitmq.publish(routing_keys::MATCH_LIKE_RECEIVED, &event).await {
        tracing::error!(error = %e, "failed to publish like.received event");
    }
}

pub async fn publish_match_created(
    rabbitmq: &RabbitMQClient,
    match_id: Uuid,
    user_a: Uuid,
    user_b: Uuid,
) {
    let event = Event::new(
        "noble-match",
        routing_keys::MATCH_CREATED,
        payloads::MatchCreated {
            match_id,
            user_a,
            user_b,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCH_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish match.created event");
    }
}

pub async fn publish_message_sent(
    rabbitmq: &RabbitMQClient,
    message_id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    preview: &str,
) {
    let event = Event::new(
        "noble-match",
        routing_keys::MESSAGE_SENT,
        payloads::MessageSent {
            message_id,
            conversation_id,
            sender_id,
            preview: preview.to_string(),
        },
    )
    .with_user(sender_id);

    if let Err(e) = rabbitmq.publish(routing_keys::MESSAGE_SENT, &event).await {
        tracing::error!(error = %e, "failed to publish message.sent event");
    }
}
