use anyhow::Result;
use async_trait::async_trait;

use crate::models::Match;

/// Trait that every match data source must implement.
///
/// Each call returns a complete replacement snapshot: both innings to date,
/// the cursor, target/chasing flags and the format.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Match>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
