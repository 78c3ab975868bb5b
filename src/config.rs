use clap::{Parser, ValueEnum};

use crate::models::MatchFormat;
use crate::stats::WinProbabilityStrategy;

/// Where match data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedKind {
    /// Weighted-random synthetic innings, regenerated each poll
    Mock,
    /// JSON match snapshots fetched from --feed-url
    Http,
    /// No polling; balls are entered through the dashboard API
    Manual,
}

/// Ball-by-ball cricket score comparator
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-comparator", version, about)]
pub struct Config {
    /// Match format: T20, ODI, Test or an overs count (e.g. 40)
    #[arg(long, env = "FORMAT")]
    pub format: MatchFormat,

    /// Match data source
    #[arg(long, env = "FEED", value_enum, default_value = "mock")]
    pub feed: FeedKind,

    /// Snapshot URL for the http feed
    #[arg(long, env = "FEED_URL")]
    pub feed_url: Option<String>,

    /// Feed polling interval in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "10")]
    pub poll_interval_secs: u64,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Win probability policy reported as the headline figure (simple or live)
    #[arg(long, env = "WIN_PROBABILITY_STRATEGY", default_value = "simple")]
    pub strategy: WinProbabilityStrategy,

    /// Team batting first
    #[arg(long, env = "TEAM_A", default_value = "India")]
    pub team_a: String,

    /// Team batting second
    #[arg(long, env = "TEAM_B", default_value = "New Zealand")]
    pub team_b: String,

    /// Target for the chasing side (mock: defaults to team A's total + 1)
    #[arg(long, env = "TARGET")]
    pub target: Option<u32>,

    /// Balls per innings the mock feed generates
    #[arg(long, env = "MOCK_BALLS", default_value = "75")]
    pub mock_balls: u32,

    /// RNG seed for reproducible mock innings
    #[arg(long, env = "MOCK_SEED")]
    pub mock_seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.feed == FeedKind::Http && self.feed_url.is_none() {
            anyhow::bail!("FEED_URL is required with --feed http");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            anyhow::bail!("team names must not be empty");
        }
        if self.team_a == self.team_b {
            anyhow::bail!("team_a and team_b must differ");
        }
        if self.mock_balls == 0 {
            anyhow::bail!("mock_balls must be positive");
        }
        if let Some(allowance) = self.format.total_balls() {
            if self.mock_balls > allowance {
                anyhow::bail!(
                    "mock_balls ({}) exceeds the {} format's {} balls",
                    self.mock_balls,
                    self.format,
                    allowance
                );
            }
        }
        if self.target == Some(0) {
            anyhow::bail!("target must be positive");
        }
        Ok(())
    }
}
