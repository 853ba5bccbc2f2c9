//! Subscriber registry and fan-out hub.
//!
//! All registry state lives inside one coordinating task that applies
//! register/unregister/publish commands strictly in arrival order, so
//! membership mutations and publishes to a horse are totally ordered with
//! no registry-wide lock. [`Hub`] is the cheaply-cloneable handle producers
//! and connection tasks use to reach that task.
//!
//! Delivery is a non-blocking `try_send` onto each connection's bounded
//! outbound queue; a full (or closed) queue evicts the connection on the
//! spot, so one slow reader can never stall delivery to the others.

use std::collections::HashMap;

use axum::extract::ws::Message;
use foalwatch_core::types::DbId;
use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

/// Capacity of each connection's outbound queue.
pub const SEND_QUEUE_CAPACITY: usize = 32;

/// Envelope type for vital-sample pushes.
pub const MSG_TYPE_SAMPLE: &str = "sample";
/// Envelope type for alert pushes.
pub const MSG_TYPE_ALERT: &str = "alert";
/// Envelope type for system-wide notices.
pub const MSG_TYPE_NOTICE: &str = "notice";

/// Channel sender half for pushing frames to one connection.
pub type ConnectionSender = mpsc::Sender<Message>;

/// `{ "type": ..., "data": ... }` envelope for every pushed frame.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: serde_json::Value,
}

impl PushMessage {
    /// Wrap a serializable payload in an envelope of the given type.
    pub fn new(kind: &'static str, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).unwrap_or_else(|e| {
            tracing::error!(error = %e, kind, "Failed to serialize push payload");
            serde_json::json!({})
        });
        Self { kind, data }
    }

    /// A plain-text system notice.
    pub fn notice(text: &str) -> Self {
        Self {
            kind: MSG_TYPE_NOTICE,
            data: serde_json::json!({ "message": text }),
        }
    }

    fn into_frame(self) -> Option<Message> {
        match serde_json::to_string(&self) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                tracing::error!(error = %e, kind = self.kind, "Failed to encode push frame");
                None
            }
        }
    }
}

/// Commands applied one at a time by the coordinating task.
enum HubCommand {
    Register {
        horse_id: DbId,
        conn_id: String,
        sender: ConnectionSender,
    },
    Unregister {
        horse_id: DbId,
        conn_id: String,
    },
    Publish {
        horse_id: DbId,
        frame: Message,
    },
    Broadcast {
        frame: Message,
    },
    SubscriberCount {
        horse_id: DbId,
        reply: oneshot::Sender<usize>,
    },
    ConnectionCount {
        reply: oneshot::Sender<usize>,
    },
    PingAll,
    CloseAll {
        reply: oneshot::Sender<usize>,
    },
}

/// Handle to the hub's coordinating task.
///
/// Cloning is cheap; all clones feed the same registry. If the coordinating
/// task has stopped, commands become no-ops and counts read as zero.
#[derive(Clone)]
pub struct Hub {
    tx: mpsc::UnboundedSender<HubCommand>,
}

impl Hub {
    /// Spawn the coordinating task and return a handle to it.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx));
        Self { tx }
    }

    fn send(&self, command: HubCommand) {
        // A closed channel means the coordinator is gone (shutdown); the
        // command is dropped deliberately.
        let _ = self.tx.send(command);
    }

    /// Add a connection to a horse's subscriber set.
    ///
    /// Idempotent per `conn_id`: re-registering replaces the stored sender.
    pub fn register(&self, horse_id: DbId, conn_id: String, sender: ConnectionSender) {
        self.send(HubCommand::Register {
            horse_id,
            conn_id,
            sender,
        });
    }

    /// Remove a connection; unknown connections are a no-op.
    pub fn unregister(&self, horse_id: DbId, conn_id: String) {
        self.send(HubCommand::Unregister { horse_id, conn_id });
    }

    /// Queue a message for every connection subscribed to `horse_id` at the
    /// moment the command is processed.
    pub fn publish(&self, horse_id: DbId, message: PushMessage) {
        if let Some(frame) = message.into_frame() {
            self.send(HubCommand::Publish { horse_id, frame });
        }
    }

    /// Queue a message for every connection across all horses.
    pub fn broadcast(&self, message: PushMessage) {
        if let Some(frame) = message.into_frame() {
            self.send(HubCommand::Broadcast { frame });
        }
    }

    /// Current subscriber count for one horse (diagnostics).
    ///
    /// Also acts as a barrier: the reply is sent only after every previously
    /// submitted command has been applied.
    pub async fn subscriber_count(&self, horse_id: DbId) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::SubscriberCount { horse_id, reply });
        rx.await.unwrap_or(0)
    }

    /// Total connection count across all horses.
    pub async fn connection_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::ConnectionCount { reply });
        rx.await.unwrap_or(0)
    }

    /// Queue a Ping frame to every connection.
    pub fn ping_all(&self) {
        self.send(HubCommand::PingAll);
    }

    /// Queue a Close frame to every connection and clear the registry.
    ///
    /// Returns the number of connections that were closed.
    pub async fn close_all(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::CloseAll { reply });
        rx.await.unwrap_or(0)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

/// The coordinating loop. Exclusive owner of the registry map.
async fn run(mut rx: mpsc::UnboundedReceiver<HubCommand>) {
    let mut registry = Registry::default();

    while let Some(command) = rx.recv().await {
        registry.apply(command);
    }

    tracing::debug!("Hub command channel closed, coordinator stopping");
}

/// horse id -> { conn id -> outbound queue sender }.
///
/// A connection appears under at most one horse; only the coordinating
/// loop mutates this map.
#[derive(Default)]
struct Registry {
    subjects: HashMap<DbId, HashMap<String, ConnectionSender>>,
}

impl Registry {
    fn apply(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register {
                horse_id,
                conn_id,
                sender,
            } => {
                self.subjects
                    .entry(horse_id)
                    .or_default()
                    .insert(conn_id, sender);
            }
            HubCommand::Unregister { horse_id, conn_id } => {
                if let Some(conns) = self.subjects.get_mut(&horse_id) {
                    conns.remove(&conn_id);
                    if conns.is_empty() {
                        self.subjects.remove(&horse_id);
                    }
                }
            }
            HubCommand::Publish { horse_id, frame } => self.fan_out(horse_id, &frame),
            HubCommand::Broadcast { frame } => self.fan_out_all(&frame),
            HubCommand::SubscriberCount { horse_id, reply } => {
                let count = self.subjects.get(&horse_id).map_or(0, HashMap::len);
                let _ = reply.send(count);
            }
            HubCommand::ConnectionCount { reply } => {
                let _ = reply.send(self.subjects.values().map(HashMap::len).sum());
            }
            HubCommand::PingAll => self.fan_out_all(&Message::Ping(axum::body::Bytes::new())),
            HubCommand::CloseAll { reply } => {
                let mut count = 0;
                for (_, conns) in self.subjects.drain() {
                    for (_, sender) in conns {
                        let _ = sender.try_send(Message::Close(None));
                        count += 1;
                    }
                }
                tracing::info!(count, "Closed all subscriber connections");
                let _ = reply.send(count);
            }
        }
    }

    /// Deliver a frame to one horse's subscribers, evicting any connection
    /// whose queue is full or gone.
    fn fan_out(&mut self, horse_id: DbId, frame: &Message) {
        let Some(conns) = self.subjects.get_mut(&horse_id) else {
            return;
        };

        conns.retain(|conn_id, sender| try_deliver(horse_id, conn_id, sender, frame));

        if conns.is_empty() {
            self.subjects.remove(&horse_id);
        }
    }

    /// Deliver a frame to every subscriber of every horse.
    fn fan_out_all(&mut self, frame: &Message) {
        self.subjects.retain(|horse_id, conns| {
            conns.retain(|conn_id, sender| try_deliver(*horse_id, conn_id, sender, frame));
            !conns.is_empty()
        });
    }
}

/// Non-blocking enqueue. Returns false when the connection must be evicted.
fn try_deliver(
    horse_id: DbId,
    conn_id: &str,
    sender: &ConnectionSender,
    frame: &Message,
) -> bool {
    match sender.try_send(frame.clone()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(%conn_id, horse_id, "Outbound queue full, evicting slow consumer");
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(%conn_id, horse_id, "Connection gone, dropping from registry");
            false
        }
    }
}
