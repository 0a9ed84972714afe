//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! dashboard pages and the server.

use serde::{Deserialize, Serialize};

use crate::feed::{DashboardSnapshot, TrendView};
use crate::reading::Reading;

/// Topic carrying every new reading
pub const TOPIC_READINGS: &str = "readings";
/// Topic carrying the refitted trend line
pub const TOPIC_TREND: &str = "trend";
/// Topic carrying server lifecycle notices
pub const TOPIC_SYSTEM: &str = "system";
/// Subscribes to every topic
pub const TOPIC_ALL: &str = "*";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for real-time updates
    Subscribe {
        /// List of topics to subscribe to (e.g., "readings", "*")
        topics: Vec<String>,
    },
    /// Unsubscribe from topics
    Unsubscribe {
        /// List of topics to unsubscribe from
        topics: Vec<String>,
    },
    /// Request the current dashboard state
    Snapshot,
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A new reading was sampled
    Reading { reading: Reading },
    /// The trend line was refitted
    Trend { trend: TrendView },
    /// Full dashboard state
    Snapshot { snapshot: DashboardSnapshot },
    /// Subscription confirmed
    Subscribed {
        /// Topics successfully subscribed to
        topics: Vec<String>,
    },
    /// Unsubscription confirmed
    Unsubscribed {
        /// Topics successfully unsubscribed from
        topics: Vec<String>,
    },
    /// Server notice
    System { message: String },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to
    pub topic: String,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    /// Create an event for a freshly sampled reading
    pub fn reading(reading: Reading) -> Self {
        Self {
            topic: TOPIC_READINGS.to_string(),
            message: ServerMessage::Reading { reading },
        }
    }

    /// Create an event for a refitted trend
    pub fn trend(trend: TrendView) -> Self {
        Self {
            topic: TOPIC_TREND.to_string(),
            message: ServerMessage::Trend { trend },
        }
    }

    /// Create a system event
    pub fn system(message: &str) -> Self {
        Self {
            topic: TOPIC_SYSTEM.to_string(),
            message: ServerMessage::System {
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Trend;
    use chrono::NaiveDate;

    fn sample_reading() -> Reading {
        let t = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        Reading::at(-17.5, t)
    }

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["readings", "trend"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics.len(), 2);
                assert_eq!(topics[0], "readings");
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping_and_snapshot() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "snapshot"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Snapshot));
    }

    #[test]
    fn test_server_message_serialize_reading() {
        let msg = ServerMessage::Reading {
            reading: sample_reading(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"reading","reading":{"temp":-17.5,"timestamp":"2024-01-15 10:30:00"}}"#
        );
    }

    #[test]
    fn test_server_message_serialize_trend() {
        let trend = Trend::fit(&[-17.0, -16.0]).unwrap();
        let msg = ServerMessage::Trend {
            trend: TrendView::from(trend),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "trend");
        assert_eq!(json["trend"]["direction"], "rising");
        assert_eq!(json["trend"]["fitted_line"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }

    #[test]
    fn test_ws_event_topics() {
        assert_eq!(WsEvent::reading(sample_reading()).topic, "readings");
        assert_eq!(WsEvent::system("shutting down").topic, "system");
    }
}
