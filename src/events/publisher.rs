use serde_json::Value;
use tokio::sync::broadcast;

/// Fire-and-forget notification publisher for exam lifecycle events.
///
/// The notification sink is a passive collaborator: delivery failures must
/// never roll back the state change that triggered them, so callers go
/// through [`EventPublisher::publish_or_log`].
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event with the given name and context
    pub async fn publish(
        &self,
        event_name: impl Into<String>,
        context: Value,
    ) -> Result<(), PublishError> {
        let event = PublishedEvent {
            name: event_name.into(),
            context,
            published_at: chrono::Utc::now(),
        };

        // A broadcast send with zero subscribers reports an error; for a
        // fire-and-forget sink that is a successful publish.
        match self.sender.send(event) {
            Ok(_) => Ok(()),
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }

    /// Publish, logging any failure at warn instead of propagating it.
    pub async fn publish_or_log(&self, event_name: &str, context: Value) {
        if let Err(err) = self.publish(event_name, context).await {
            tracing::warn!(
                event = %event_name,
                error = %err,
                "notification delivery failed; state change is unaffected"
            );
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let publisher = EventPublisher::default();
        publisher
            .publish("exam.submitted", json!({"attempt_id": "a1"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let publisher = EventPublisher::new(16);
        let mut receiver = publisher.subscribe();

        publisher
            .publish("exam.result_published", json!({"score": 9}))
            .await
            .unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.name, "exam.result_published");
        assert_eq!(event.context["score"], 9);
    }
}
