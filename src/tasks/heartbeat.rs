use crate::registry::PollRegistry;
use log::info;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::interval;

const HEARTBEAT_INTERVAL_SECONDS: u64 = 300; // every 5 minutes

pub async fn heartbeat_task(registry: Arc<PollRegistry>) {
    let mut interval = interval(StdDuration::from_secs(HEARTBEAT_INTERVAL_SECONDS));
    interval.tick().await; // first tick completes immediately

    loop {
        interval.tick().await;
        info!("Heartbeat - active votes: {}", registry.active_count().await);
    }
}
