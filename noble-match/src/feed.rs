// src/feed.rs
//
// Per-conversation change feed.
//
// Every write to a conversation (message appended, read state changed) is
// announced on a `tokio::sync::broadcast` channel scoped to that
// conversation.  The SSE route subscribes here and re-reads the message log
// on each announcement, so connected clients always receive the full
// current history in chronological order.
//
// Subscriptions are explicit handles: dropping a `FeedSubscription` (or
// the SSE connection closing) releases the listener, and the channel for a
// conversation is removed once its last subscriber is gone.
//
// ────────────────────────────────────────────────────────────────────────────

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

// ─── Events ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedChange {
    MessageSent,
    ReadStateChanged,
}

#[derive(Debug, Clone, Copy)]
pub struct FeedEvent {
    pub conversation_id: Uuid,
    pub change: FeedChange,
}

// ─── ConversationFeed ───────────────────────────────────────────────────────

/// Registry of per-conversation broadcast channels. Cheap to clone
/// (interior `Arc`).
#[derive(Clone)]
pub struct ConversationFeed {
    channels: Arc<DashMap<Uuid, broadcast::Sender<FeedEvent>>>,
}

impl ConversationFeed {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
        }
    }

    /// Open a live subscription for one conversation. The returned handle
    /// must be kept alive for as long as updates are wanted; dropping it
    /// tears the listener down.
    pub fn subscribe(&self, conversation_id: Uuid) -> FeedSubscription {
        let rx = self
            .channels
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe();

        debug!(conversation_id = %conversation_id, "feed subscription opened");

        FeedSubscription {
            conversation_id,
            rx,
            channels: Arc::clone(&self.channels),
        }
    }

    /// Announce a change. Returns the number of live subscribers notified;
    /// zero (no open feeds for this conversation) is normal.
    pub fn notify(&self, conversation_id: Uuid, change: FeedChange) -> usize {
        let event = FeedEvent {
            conversation_id,
            change,
        };
        match self.channels.get(&conversation_id) {
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for ConversationFeed {
    fn default() -> Self {
        Self::new()
    }
}

// ─── FeedSubscription ───────────────────────────────────────────────────────

/// Live handle onto one conversation's change stream.
pub struct FeedSubscription {
    conversation_id: Uuid,
    rx: broadcast::Receiver<FeedEvent>,
    channels: Arc<DashMap<Uuid, broadcast::Sender<FeedEvent>>>,
}

impl FeedSubscription {
    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    /// Wait for the next change announcement.
    pub async fn recv(&mut self) -> Result<FeedEvent, broadcast::error::RecvError> {
        self.rx.recv().await
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        // Our receiver is still counted while this body runs, so a count of
        // one means no other subscriber remains on this conversation.
        self.channels
            .remove_if(&self.conversation_id, |_, tx| tx.receiver_count() <= 1);
        debug!(conversation_id = %self.conversation_id, "feed subscription closed");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fanout_to_all_subscribers() {
        let feed = ConversationFeed::new();
        let conv = Uuid::now_v7();

        let mut sub1 = feed.subscribe(conv);
        let mut sub2 = feed.subscribe(conv);

        let notified = feed.notify(conv, FeedChange::MessageSent);
        assert_eq!(notified, 2);

        let e1 = sub1.recv().await.unwrap();
        let e2 = sub2.recv().await.unwrap();
        assert_eq!(e1.conversation_id, conv);
        assert_eq!(e2.change, FeedChange::MessageSent);
    }

    #[tokio::test]
    async fn events_are_scoped_per_conversation() {
        let feed = ConversationFeed::new();
        let conv_a = Uuid::now_v7();
        let conv_b = Uuid::now_v7();

        let mut sub_a = feed.subscribe(conv_a);
        let _sub_b = feed.subscribe(conv_b);

        assert_eq!(feed.notify(conv_b, FeedChange::MessageSent), 1);
        assert_eq!(feed.notify(conv_a, FeedChange::ReadStateChanged), 1);

        // sub_a sees only its own conversation's event
        let e = sub_a.recv().await.unwrap();
        assert_eq!(e.conversation_id, conv_a);
        assert_eq!(e.change, FeedChange::ReadStateChanged);
    }

    #[tokio::test]
    async fn notify_without_subscribers_is_a_noop() {
        let feed = ConversationFeed::new();
        assert_eq!(feed.notify(Uuid::now_v7(), FeedChange::MessageSent), 0);
    }

    #[tokio::test]
    async fn dropping_last_handle_releases_channel() {
        let feed = ConversationFeed::new();
        let conv = Uuid::now_v7();

        let sub1 = feed.subscribe(conv);
        let sub2 = feed.subscribe(conv);
        assert_eq!(feed.channel_count(), 1);

        drop(sub1);
        assert_eq!(feed.channel_count(), 1);

        drop(sub2);
        assert_eq!(feed.channel_count(), 0);
        assert_eq!(feed.notify(conv, FeedChange::MessageSent), 0);
    }
}
