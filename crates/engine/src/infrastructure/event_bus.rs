//! In-process, ordered publish/subscribe for domain events.
//!
//! Constructed explicitly at wiring time and handed to whoever publishes.
//! Subscribers run sequentially in registration order within one `publish`
//! call; a failing subscriber is logged and does not stop the others.

use std::sync::Arc;

use async_trait::async_trait;
use nightfall_domain::DomainEvent;
use nightfall_shared::ServerEvent;

use crate::infrastructure::ports::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    fn name(&self) -> &'static str;

    /// React to an event, returning notifications for connected characters.
    async fn handle(&self, event: &DomainEvent) -> Result<Vec<ServerEvent>, RepoError>;
}

#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub async fn publish(&self, event: &DomainEvent) -> Vec<ServerEvent> {
        let mut out = Vec::new();
        for subscriber in &self.subscribers {
            match subscriber.handle(event).await {
                Ok(events) => out.extend(events),
                Err(e) => {
                    tracing::warn!(
                        subscriber = subscriber.name(),
                        event = event.name(),
                        error = %e,
                        "Event subscriber failed"
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::mob;
    use nightfall_domain::RoomId;

    fn defeated() -> DomainEvent {
        DomainEvent::MobDefeated {
            mob: mob("Gloomfang Pup", RoomId::new("the-arena")),
            killer: None,
            room_id: RoomId::new("the-arena"),
        }
    }

    #[tokio::test]
    async fn subscribers_run_in_registration_order() {
        let mut first = MockEventSubscriber::new();
        first.expect_name().return_const("first");
        first
            .expect_handle()
            .times(1)
            .returning(|_| Ok(vec![ServerEvent::room_message("the-arena", "one", vec![])]));

        let mut second = MockEventSubscriber::new();
        second.expect_name().return_const("second");
        second
            .expect_handle()
            .times(1)
            .returning(|_| Ok(vec![ServerEvent::room_message("the-arena", "two", vec![])]));

        let bus = EventBus::new()
            .with_subscriber(Arc::new(first))
            .with_subscriber(Arc::new(second));

        let events = bus.publish(&defeated()).await;
        let texts: Vec<&str> = events.iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn failing_subscriber_does_not_block_the_rest() {
        let mut broken = MockEventSubscriber::new();
        broken.expect_name().return_const("broken");
        broken
            .expect_handle()
            .returning(|_| Err(RepoError::database("loot.create", "disk full")));

        let mut healthy = MockEventSubscriber::new();
        healthy.expect_name().return_const("healthy");
        healthy
            .expect_handle()
            .returning(|_| Ok(vec![ServerEvent::room_message("the-arena", "ok", vec![])]));

        let bus = EventBus::new()
            .with_subscriber(Arc::new(broken))
            .with_subscriber(Arc::new(healthy));

        let events = bus.publish(&defeated()).await;
        assert_eq!(events.len(), 1);
        assert_eq!(bus.subscriber_count(), 2);
    }
}
