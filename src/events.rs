use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Domain events emitted by the commerce services.
///
/// Every successful cart or order mutation publishes one of these on the
/// application event channel. Consumers (analytics, notifications, cache
/// invalidation) subscribe out-of-band; event delivery never blocks or fails
/// the originating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Cart events
    CartItemAdded { product_id: u32, quantity: u32 },
    CartItemUpdated { product_id: u32, quantity: u32 },
    CartItemRemoved { product_id: u32 },
    CartCleared,

    // Order events
    OrderCreated(u32),
}

/// Cloneable handle for publishing events onto the bounded application channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a sender/receiver pair over a bounded channel of the given capacity.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging (rather than propagating) a channel failure.
    ///
    /// Event delivery is best-effort: a full or closed channel must never fail
    /// the cart or order operation that produced the event.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            error!(error = %e, ?event, "Failed to publish event");
        }
    }
}

/// Trait for pluggable event consumers.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: Event);
}

/// Default handler that logs each event at info level.
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn handle_event(&self, event: Event) {
        info!(?event, "Event received");
    }
}

/// Drains the event channel, dispatching each event to the given handler.
///
/// Runs until the channel closes (all senders dropped). Typically spawned as
/// a background task at application start.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>, handler: impl EventHandler) {
    while let Some(event) = receiver.recv().await {
        handler.handle_event(event).await;
    }
    info!("Event channel closed; event processor shutting down");
}
