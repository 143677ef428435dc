//! Realtime chat relay
//!
//! Sockets join caller-named rooms and every message sent to a room is
//! broadcast to the sockets joined to it at that moment. Membership lives in
//! process memory only; nothing is persisted.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

pub type ConnectionId = Uuid;

/// Events buffered per socket before further broadcasts to it are dropped
pub const CONNECTION_BUFFER: usize = 64;

/// Client to server events
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinRoom(String),
    SendMessage(SendMessage),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub room_id: String,
    pub message: String,
    pub sender: String,
}

/// Server to client events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    ReceiveMessage(ChatMessage),
}

/// Message relayed to room members
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub message: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
struct RelayState {
    connections: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

/// Room membership and broadcast, shared by all socket tasks
#[derive(Clone, Default)]
pub struct ChatRelay {
    inner: Arc<RwLock<RelayState>>,
}

impl ChatRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiver for events addressed to it
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);
        self.inner.write().await.connections.insert(id, tx);
        tracing::info!(connection_id = %id, "Chat socket connected");
        (id, rx)
    }

    pub async fn join_room(&self, connection: ConnectionId, room_id: String) {
        let mut state = self.inner.write().await;
        if !state.connections.contains_key(&connection) {
            return;
        }
        tracing::info!(connection_id = %connection, room_id = %room_id, "Joined room");
        state.rooms.entry(room_id).or_default().insert(connection);
    }

    /// Broadcast to every socket currently in `room_id`, returning how many were reached
    ///
    /// Sockets whose buffer is full miss the message.
    pub async fn send_message(&self, room_id: &str, message: String, sender: String) -> usize {
        let event = ServerEvent::ReceiveMessage(ChatMessage {
            message,
            sender,
            timestamp: Utc::now(),
        });

        let state = self.inner.read().await;
        let Some(members) = state.rooms.get(room_id) else {
            return 0;
        };

        members
            .iter()
            .filter_map(|id| state.connections.get(id).map(|tx| (id, tx)))
            .filter(|(id, tx)| match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(connection_id = %id, "Dropping message for lagging socket");
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            })
            .count()
    }

    /// Drop the connection from every room
    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut state = self.inner.write().await;
        state.connections.remove(&connection);
        state.rooms.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
        tracing::info!(connection_id = %connection, "Chat socket disconnected");
    }

    /// Apply one text frame received from `connection`
    pub async fn handle_frame(&self, connection: ConnectionId, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(ClientEvent::JoinRoom(room_id)) => self.join_room(connection, room_id).await,
            Ok(ClientEvent::SendMessage(msg)) => {
                let delivered = self
                    .send_message(&msg.room_id, msg.message, msg.sender)
                    .await;
                tracing::debug!(room_id = %msg.room_id, delivered, "Message relayed");
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection,
                    error = %e,
                    "Ignoring malformed chat frame"
                );
            }
        }
    }

    /// Number of sockets joined to `room_id`
    pub async fn room_size(&self, room_id: &str) -> usize {
        self.inner
            .read()
            .await
            .rooms
            .get(room_id)
            .map_or(0, HashSet::len)
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(relay): State<ChatRelay>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: ChatRelay) {
    let (connection, mut events) = relay.connect().await;
    let (mut sink, mut stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode chat event");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let frame_relay = relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => frame_relay.handle_frame(connection, &text).await,
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    relay.disconnect(connection).await;
}
