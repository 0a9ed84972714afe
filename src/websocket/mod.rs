//! WebSocket Real-Time Streaming
//!
//! Pushes new readings and trend updates to dashboard pages.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages all active connections and subscriptions
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/api/v1/ws` and can subscribe to topics:
//! - `readings` - Every new reading
//! - `trend` - Refitted trend line (trend dashboard only)
//! - `system` - System events
//! - `*` - Everything
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8000/api/v1/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['readings']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   console.log('Received:', msg);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{
    ClientMessage, ServerMessage, WsEvent, TOPIC_ALL, TOPIC_READINGS, TOPIC_SYSTEM, TOPIC_TREND,
};
