use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use foalwatch_core::error::CoreError;
use foalwatch_core::types::DbId;
use foalwatch_db::repositories::HorseRepo;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::hub::{Hub, SEND_QUEUE_CAPACITY};

/// How long the read loop waits for any inbound frame before treating the
/// connection as dead. Must exceed two heartbeat intervals so a healthy
/// client always produces a Pong in time.
const READ_DEADLINE: Duration = Duration::from_secs(75);

/// HTTP handler that upgrades to a WebSocket subscribed to one horse.
///
/// The horse must exist; unknown ids are rejected before the upgrade.
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    Path(horse_id): Path<DbId>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if HorseRepo::get_by_id(&state.pool, horse_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "horse",
            id: horse_id,
        }));
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state.hub.clone(), horse_id)))
}

/// Manage a single subscriber connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers a bounded outbound queue with the hub.
///   2. Spawns a write task draining that queue into the sink.
///   3. Runs the read loop under the liveness deadline on the current task.
///   4. Unregisters and tears down on any exit path.
async fn handle_socket(socket: WebSocket, hub: Hub, horse_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, horse_id, "Subscriber connected");

    let (tx, mut rx) = mpsc::channel::<Message>(SEND_QUEUE_CAPACITY);
    hub.register(horse_id, conn_id.clone(), tx);

    let (mut sink, mut stream) = socket.split();

    // Write task: drain the queue into the sink. Ends when the hub drops
    // the sender (eviction / close-all) or the transport fails.
    let writer_conn_id = conn_id.clone();
    let write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %writer_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    // Read loop: the protocol is push-dominant, so only control frames are
    // expected inbound. Every exit path below is terminal for the
    // connection — there is no server-side reconnect.
    loop {
        match tokio::time::timeout(READ_DEADLINE, stream.next()).await {
            Err(_) => {
                tracing::info!(conn_id = %conn_id, horse_id, "Liveness deadline expired");
                break;
            }
            Ok(None) => break,
            Ok(Some(Ok(Message::Close(_)))) => break,
            Ok(Some(Ok(Message::Pong(_)))) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Some(Ok(_))) => {
                // Data frames from subscribers are ignored.
            }
            Ok(Some(Err(e))) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    hub.unregister(horse_id, conn_id.clone());
    write_task.abort();
    tracing::info!(conn_id = %conn_id, horse_id, "Subscriber disconnected");
}
