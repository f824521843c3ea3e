//! # Sandbox Mediator
//!
//! In-process publish/subscribe transport connecting the registry to the rest
//! of the dashboard application. Components never hold references to each
//! other; they exchange [`Message`] values over named channels.
//!
//! Delivery is sequential: `notify` snapshots the channel's subscribers, then
//! invokes them one at a time to completion. A subscriber may call `notify`
//! or `listen` re-entrantly from inside its handler, since no lock is held
//! while handlers run. Subscriber errors are logged and do not stop delivery
//! to later subscribers; publishing to a channel with no subscribers is
//! accepted silently.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::error::Result;

use super::messages::Message;

/// Trait for components that receive messages on a sandbox channel.
#[async_trait]
pub trait ChannelSubscriber: Send + Sync {
    /// Handle a message delivered on `channel`.
    async fn on_message(&self, channel: &str, message: &Message) -> Result<()>;

    /// Get subscriber name for identification
    fn subscriber_name(&self) -> &str {
        "unnamed_subscriber"
    }
}

/// The mediator. Cheap to clone; clones share the subscription table.
#[derive(Clone, Default)]
pub struct Sandbox {
    /// Map of channel name to subscribers, in registration order
    subscribers: Arc<RwLock<HashMap<String, Vec<Arc<dyn ChannelSubscriber>>>>>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `subscriber` to `channel`.
    pub async fn listen(&self, channel: &str, subscriber: Arc<dyn ChannelSubscriber>) {
        let mut subscribers = self.subscribers.write().await;
        subscribers
            .entry(channel.to_string())
            .or_default()
            .push(subscriber.clone());

        debug!(
            channel,
            subscriber = subscriber.subscriber_name(),
            "Subscribed to channel"
        );
    }

    /// Publish `message` to every subscriber of `channel`.
    pub async fn notify(&self, channel: &str, message: Message) {
        let subscribers: Vec<Arc<dyn ChannelSubscriber>> = {
            let table = self.subscribers.read().await;
            table.get(channel).cloned().unwrap_or_default()
        };

        if subscribers.is_empty() {
            // Publishing into the void is acceptable; listeners may come later
            debug!(channel, action = message.action_name(), "No subscribers for channel");
            return;
        }

        for subscriber in subscribers {
            if let Err(e) = subscriber.on_message(channel, &message).await {
                error!(
                    channel,
                    subscriber = subscriber.subscriber_name(),
                    error = %e,
                    "Subscriber failed to handle message"
                );
            }
        }
    }

    /// Number of subscribers currently listening on `channel`.
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        let subscribers = self.subscribers.read().await;
        subscribers.get(channel).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::InputType;
    use crate::error::RegistryError;
    use crate::events::RegistryEvent;
    use std::sync::Mutex;

    /// Test subscriber that records every message it receives.
    struct RecordingSubscriber {
        name: String,
        received: Mutex<Vec<(String, Message)>>,
    }

    impl RecordingSubscriber {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                received: Mutex::new(Vec::new()),
            }
        }

        fn received(&self) -> Vec<(String, Message)> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChannelSubscriber for RecordingSubscriber {
        async fn on_message(&self, channel: &str, message: &Message) -> Result<()> {
            self.received
                .lock()
                .unwrap()
                .push((channel.to_string(), message.clone()));
            Ok(())
        }

        fn subscriber_name(&self) -> &str {
            &self.name
        }
    }

    /// Test subscriber that always fails.
    struct FailingSubscriber;

    #[async_trait]
    impl ChannelSubscriber for FailingSubscriber {
        async fn on_message(&self, _channel: &str, _message: &Message) -> Result<()> {
            Err(RegistryError::InvalidInputType("boom".to_string()))
        }
    }

    fn sample_event() -> Message {
        Message::from(RegistryEvent::RegisteredInputTypes {
            input_types: vec![InputType::Node],
        })
    }

    #[tokio::test]
    async fn test_notify_without_subscribers_is_accepted() {
        let sandbox = Sandbox::new();
        sandbox.notify("Registry", sample_event()).await;
        assert_eq!(sandbox.subscriber_count("Registry").await, 0);
    }

    #[tokio::test]
    async fn test_delivery_to_channel_subscribers() {
        let sandbox = Sandbox::new();
        let subscriber = Arc::new(RecordingSubscriber::new("menu"));
        sandbox.listen("Registry", subscriber.clone()).await;

        sandbox.notify("Registry", sample_event()).await;

        let received = subscriber.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, "Registry");
        assert_eq!(received[0].1, sample_event());
    }

    #[tokio::test]
    async fn test_channels_are_isolated() {
        let sandbox = Sandbox::new();
        let registry_side = Arc::new(RecordingSubscriber::new("registry_side"));
        let other_side = Arc::new(RecordingSubscriber::new("other_side"));
        sandbox.listen("Registry", registry_side.clone()).await;
        sandbox.listen("ContextMenu", other_side.clone()).await;

        sandbox.notify("Registry", sample_event()).await;

        assert_eq!(registry_side.received().len(), 1);
        assert!(other_side.received().is_empty());
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_block_later_ones() {
        let sandbox = Sandbox::new();
        let survivor = Arc::new(RecordingSubscriber::new("survivor"));
        sandbox.listen("Registry", Arc::new(FailingSubscriber)).await;
        sandbox.listen("Registry", survivor.clone()).await;

        sandbox.notify("Registry", sample_event()).await;

        assert_eq!(survivor.received().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_registration_order() {
        let sandbox = Sandbox::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        struct Ordered {
            tag: &'static str,
            order: Arc<Mutex<Vec<&'static str>>>,
        }

        #[async_trait]
        impl ChannelSubscriber for Ordered {
            async fn on_message(&self, _channel: &str, _message: &Message) -> Result<()> {
                self.order.lock().unwrap().push(self.tag);
                Ok(())
            }
        }

        sandbox
            .listen(
                "Registry",
                Arc::new(Ordered {
                    tag: "first",
                    order: order.clone(),
                }),
            )
            .await;
        sandbox
            .listen(
                "Registry",
                Arc::new(Ordered {
                    tag: "second",
                    order: order.clone(),
                }),
            )
            .await;

        sandbox.notify("Registry", sample_event()).await;

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }
}
