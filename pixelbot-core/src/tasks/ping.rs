// src/tasks/ping.rs

use std::time::Duration;

use tracing::{info, warn};

/// Keep-alive interval for hosts that sleep idle processes.
const PING_INTERVAL: Duration = Duration::from_secs(550);

/// Spawns a task that GETs `url` every few minutes.
pub fn spawn_ping_task(http: reqwest::Client, url: String) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PING_INTERVAL);
        loop {
            interval.tick().await;
            info!("Pinging {url}");
            match http.get(&url).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    warn!("(Ping) {url} answered {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => warn!("(Ping) {url} unreachable: {e}"),
            }
        }
    })
}
