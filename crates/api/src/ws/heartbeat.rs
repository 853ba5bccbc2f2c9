use std::time::Duration;

use crate::ws::hub::Hub;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that queues periodic Ping frames for every
/// subscriber connection via the hub.
///
/// A connection that stops responding produces no inbound frames, so its
/// read deadline expires and it tears itself down; the pings here are what
/// keep healthy clients producing Pongs inside that deadline.
pub fn start_heartbeat(hub: Hub) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = hub.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            hub.ping_all();
        }
    })
}
