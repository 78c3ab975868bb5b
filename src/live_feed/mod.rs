pub mod http;
pub mod mock;
pub mod provider;

pub use http::HttpSnapshotFeed;
pub use mock::MockMatchFeed;
pub use provider::MatchFeed;

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::session::SharedSession;

/// Handle to a running refresh monitor.
pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stop polling. Each poll replaces the session wholesale, so stopping
    /// between or during polls never leaves partial state behind.
    pub fn stop(self) {
        self.task.abort();
        info!("Match monitor stopped");
    }
}

/// Spawns a background task that polls `feed` at a fixed interval and swaps
/// each valid snapshot into `session`.
///
/// Statistics are recomputed from the snapshot on read; the monitor keeps no
/// state between polls. A failed or invalid poll is logged and the previous
/// snapshot stays in place.
pub fn start_match_monitor(
    feed: Arc<dyn MatchFeed>,
    session: SharedSession,
    poll_interval: Duration,
) -> MonitorHandle {
    let task = tokio::spawn(async move {
        info!(
            "Match monitor started (feed: {}, interval={:?})",
            feed.name(),
            poll_interval
        );

        let fetch_timeout = poll_interval.min(Duration::from_secs(5));
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let snapshot = match tokio::time::timeout(fetch_timeout, feed.fetch_snapshot()).await {
                Ok(Ok(snapshot)) => snapshot,
                Ok(Err(e)) => {
                    warn!("Feed '{}' failed: {:#}", feed.name(), e);
                    continue;
                }
                Err(_) => {
                    warn!("Feed '{}' timed out after {:?}", feed.name(), fetch_timeout);
                    continue;
                }
            };

            let summary = format!(
                "{} {}/{} vs {} {}/{} at ball {}",
                snapshot.team_a.short_name,
                snapshot.team_a.innings.total_runs(),
                snapshot.team_a.innings.wickets(),
                snapshot.team_b.short_name,
                snapshot.team_b.innings.total_runs(),
                snapshot.team_b.innings.wickets(),
                snapshot.current_ball
            );

            let mut guard = session.write().await;
            match guard.replace_snapshot(snapshot, feed.name()) {
                Ok(()) => info!("Snapshot refreshed: {}", summary),
                Err(e) => warn!("Discarding invalid snapshot from '{}': {}", feed.name(), e),
            }
        }
    });

    MonitorHandle { task }
}
