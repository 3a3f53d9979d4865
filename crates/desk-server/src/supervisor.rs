//! Background liveness supervision.
//!
//! Pings the database on a fixed interval. A failed ping is logged and
//! followed by one reconnect attempt; a failed reconnect leaves the current
//! pool in place and is retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use desk_db::DeskDb;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Spawn the supervisor. It stops when `shutdown` is cancelled.
pub fn spawn(db: Arc<DeskDb>, interval: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; connect() has just pinged.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => check(&db).await,
            }
        }
        tracing::debug!("liveness supervisor stopped");
    })
}

async fn check(db: &DeskDb) {
    let Err(error) = db.ping().await else {
        return;
    };
    tracing::warn!(%error, "database ping failed, reconnecting");
    match db.reconnect().await {
        Ok(()) => tracing::info!("database connection restored"),
        Err(error) => tracing::error!(%error, "database reconnect failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.db");
        let db = Arc::new(DeskDb::open_local(&path.to_string_lossy()).await.unwrap());
        let shutdown = CancellationToken::new();

        let handle = spawn(Arc::clone(&db), Duration::from_millis(10), shutdown.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("supervisor should stop")
            .unwrap();
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn healthy_ping_keeps_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.db");
        let db = DeskDb::open_local(&path.to_string_lossy()).await.unwrap();
        let before = db.pool();

        check(&db).await;

        assert!(Arc::ptr_eq(&before, &db.pool()));
    }
}
