//! Background eviction of idle sessions.

use std::time::Duration;

use confbot_ai::SessionStore;
use tokio::task::JoinHandle;

/// Every `interval`, drop sessions idle for longer than `ttl`.
pub fn spawn_reaper(store: SessionStore, ttl: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let reaped = store.reap_idle(ttl);
            tracing::debug!(reaped, sessions = store.len(), "Reaper tick");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reaper_evicts_idle_sessions() {
        let store = SessionStore::default();
        let session = store.create();

        let handle = spawn_reaper(
            store.clone(),
            Duration::from_millis(5),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(store.get(&session.id()).is_none());
        assert!(store.is_empty());
    }
}
