//! WebSocket Connection Hub
//!
//! Tracks open dashboard sockets and the topics each one follows. Every
//! published event also goes out on a tokio broadcast channel so in-process
//! listeners (the terminal `watch` command) see the same feed.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, RwLock};
use uuid::Uuid;

use super::messages::{ServerMessage, WsEvent, TOPIC_ALL, TOPIC_READINGS, TOPIC_SYSTEM, TOPIC_TREND};

/// Identifier handed out to each socket on registration
pub type ConnectionId = String;

/// Outgoing queue of a single socket
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Hub limits
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Sockets accepted at once
    pub max_connections: usize,
    /// Events buffered per in-process listener before it lags
    pub broadcast_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 256,
            broadcast_capacity: 64,
        }
    }
}

struct Subscriber {
    outbox: Outbox,
    topics: HashSet<String>,
}

/// Both indexes live behind one lock so they never disagree.
#[derive(Default)]
struct Registry {
    subscribers: HashMap<ConnectionId, Subscriber>,
    by_topic: HashMap<String, HashSet<ConnectionId>>,
}

impl Registry {
    fn detach(&mut self, topic: &str, id: &str) {
        if let Some(ids) = self.by_topic.get_mut(topic) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_topic.remove(topic);
            }
        }
    }

    /// Sockets following `topic` directly or through the wildcard
    fn audience(&self, topic: &str) -> HashSet<&ConnectionId> {
        [topic, TOPIC_ALL]
            .iter()
            .filter_map(|t| self.by_topic.get(*t))
            .flatten()
            .collect()
    }
}

/// Fan-out point between the live feed and connected dashboards
pub struct ConnectionHub {
    registry: RwLock<Registry>,
    events: broadcast::Sender<WsEvent>,
    config: HubConfig,
}

impl ConnectionHub {
    pub fn new(config: HubConfig) -> Self {
        let (events, _) = broadcast::channel(config.broadcast_capacity);
        Self {
            registry: RwLock::new(Registry::default()),
            events,
            config,
        }
    }

    /// Admit a socket, failing once `max_connections` are open
    pub async fn register(&self, outbox: Outbox) -> Result<ConnectionId, HubError> {
        let mut registry = self.registry.write().await;
        if registry.subscribers.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        registry.subscribers.insert(
            id.clone(),
            Subscriber {
                outbox,
                topics: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "Dashboard socket opened");
        Ok(id)
    }

    /// Forget a socket and every topic it followed
    pub async fn unregister(&self, id: &str) {
        let mut registry = self.registry.write().await;
        if let Some(subscriber) = registry.subscribers.remove(id) {
            for topic in &subscriber.topics {
                registry.detach(topic, id);
            }
            tracing::info!(connection_id = %id, "Dashboard socket closed");
        }
    }

    /// Follow topics; unknown names are skipped. Returns the accepted topics.
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut registry = self.registry.write().await;
        let subscriber = registry
            .subscribers
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let (accepted, rejected): (Vec<String>, Vec<String>) =
            topics.into_iter().partition(|t| is_valid_topic(t));
        if !rejected.is_empty() {
            tracing::warn!(connection_id = %id, topics = ?rejected, "Unknown topics ignored");
        }

        subscriber.topics.extend(accepted.iter().cloned());
        for topic in &accepted {
            registry
                .by_topic
                .entry(topic.clone())
                .or_default()
                .insert(id.to_string());
        }

        tracing::debug!(connection_id = %id, topics = ?accepted, "Topics followed");
        Ok(accepted)
    }

    /// Stop following topics. Returns the ones that were actually followed.
    pub async fn unsubscribe(
        &self,
        id: &str,
        topics: Vec<String>,
    ) -> Result<Vec<String>, HubError> {
        let mut registry = self.registry.write().await;
        let subscriber = registry
            .subscribers
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let dropped: Vec<String> = topics
            .into_iter()
            .filter(|t| subscriber.topics.remove(t))
            .collect();
        for topic in &dropped {
            registry.detach(topic, id);
        }

        tracing::debug!(connection_id = %id, topics = ?dropped, "Topics dropped");
        Ok(dropped)
    }

    /// Queue an event for every socket following its topic.
    ///
    /// A socket subscribed both to the topic and to `*` gets it once.
    /// Returns how many sockets accepted the message.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        let registry = self.registry.read().await;

        let delivered = registry
            .audience(&event.topic)
            .into_iter()
            .filter_map(|id| registry.subscribers.get(id))
            .filter(|s| s.outbox.send(event.message.clone()).is_ok())
            .count();

        if delivered > 0 {
            tracing::trace!(topic = %event.topic, delivered, "Event delivered");
        }
        delivered
    }

    /// Hand an event to in-process listeners, then to subscribed sockets
    pub async fn publish(&self, event: WsEvent) {
        // Err only means no listener is attached right now
        let _ = self.events.send(event.clone());
        self.broadcast(&event).await;
    }

    /// Reply to one socket regardless of its topics
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let registry = self.registry.read().await;
        registry
            .subscribers
            .get(id)
            .ok_or(HubError::ConnectionNotFound)?
            .outbox
            .send(message)
            .map_err(|_| HubError::SendFailed)
    }

    /// Receiver for every published event, whatever its topic
    pub fn subscribe_broadcast(&self) -> broadcast::Receiver<WsEvent> {
        self.events.subscribe()
    }

    pub async fn connection_count(&self) -> usize {
        self.registry.read().await.subscribers.len()
    }

    /// Sockets following `topic` by name (wildcard followers not counted)
    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.registry
            .read()
            .await
            .by_topic
            .get(topic)
            .map_or(0, HashSet::len)
    }
}

fn is_valid_topic(topic: &str) -> bool {
    matches!(
        topic,
        TOPIC_READINGS | TOPIC_TREND | TOPIC_SYSTEM | TOPIC_ALL
    )
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error("Connection limit of {0} reached")]
    TooManyConnections(usize),

    #[error("Unknown connection")]
    ConnectionNotFound,

    #[error("Socket outbox closed")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use chrono::NaiveDate;

    fn reading_event() -> WsEvent {
        let t = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        WsEvent::reading(Reading::at(-17.1, t))
    }

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_topic_names() {
        for topic in ["readings", "trend", "system", "*"] {
            assert!(is_valid_topic(topic), "{topic}");
        }
        assert!(!is_valid_topic(""));
        assert!(!is_valid_topic("reading"));
    }

    #[tokio::test]
    async fn test_register_then_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, topics(&["readings", "trend"])).await.unwrap();
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
        assert_eq!(hub.subscription_count("readings").await, 0);
        assert_eq!(hub.subscription_count("trend").await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_skips_unknown_topics() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let accepted = hub.subscribe(&id, topics(&["readings", "bogus"])).await.unwrap();
        assert_eq!(accepted, vec!["readings"]);
        assert_eq!(hub.subscription_count("readings").await, 1);

        // Only followed topics come back
        let dropped = hub.unsubscribe(&id, topics(&["readings", "trend"])).await.unwrap();
        assert_eq!(dropped, vec!["readings"]);
        assert_eq!(hub.subscription_count("readings").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_connection_is_an_error() {
        let hub = ConnectionHub::new(HubConfig::default());

        let result = hub.subscribe("missing", topics(&["readings"])).await;
        assert!(matches!(result, Err(HubError::ConnectionNotFound)));

        let result = hub.send_to("missing", ServerMessage::Pong).await;
        assert!(matches!(result, Err(HubError::ConnectionNotFound)));
    }

    #[tokio::test]
    async fn test_connection_limit_is_enforced() {
        let hub = ConnectionHub::new(HubConfig {
            max_connections: 1,
            broadcast_capacity: 8,
        });

        let (first, _) = mpsc::unbounded_channel();
        let (second, _) = mpsc::unbounded_channel();
        let id = hub.register(first).await.unwrap();

        assert!(matches!(
            hub.register(second).await,
            Err(HubError::TooManyConnections(1))
        ));

        // A slot frees up after unregistering
        hub.unregister(&id).await;
        let (third, _) = mpsc::unbounded_channel();
        assert!(hub.register(third).await.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_followers() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (follower_tx, mut follower) = mpsc::unbounded_channel();
        let (idle_tx, mut idle) = mpsc::unbounded_channel();

        let id = hub.register(follower_tx).await.unwrap();
        hub.register(idle_tx).await.unwrap();
        hub.subscribe(&id, topics(&["readings"])).await.unwrap();

        assert_eq!(hub.broadcast(&reading_event()).await, 1);
        assert!(matches!(follower.try_recv(), Ok(ServerMessage::Reading { .. })));
        assert!(idle.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wildcard_delivers_once() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, topics(&["*", "readings"])).await.unwrap();

        assert_eq!(hub.broadcast(&reading_event()).await, 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        hub.broadcast(&WsEvent::system("hello")).await;
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::System { .. })));
    }

    #[tokio::test]
    async fn test_closed_outbox_is_not_counted() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, topics(&["readings"])).await.unwrap();
        drop(rx);

        assert_eq!(hub.broadcast(&reading_event()).await, 0);
        assert!(matches!(
            hub.send_to(&id, ServerMessage::Pong).await,
            Err(HubError::SendFailed)
        ));
    }

    #[tokio::test]
    async fn test_publish_reaches_in_process_listeners() {
        let hub = ConnectionHub::new(HubConfig::default());
        let mut listener = hub.subscribe_broadcast();

        hub.publish(reading_event()).await;

        let event = listener.recv().await.unwrap();
        assert_eq!(event.topic, "readings");
    }
}
