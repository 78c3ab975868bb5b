//! Explicitly owned match session.
//!
//! The session holds the only mutable match state: both append-only innings
//! and the current team / current ball cursor. Feed snapshots replace it
//! wholesale; manual entry appends through the ball recorder.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{BallRecord, Match, MatchFormat, Team, TeamSide};
use crate::stats::{
    self, ComparisonResult, SeriesRow, StatsError, WinProbability, WinProbabilityStrategy,
};

/// Session shared between the refresh monitor and the dashboard.
pub type SharedSession = Arc<RwLock<MatchSession>>;

#[derive(Debug, Clone)]
pub struct MatchSession {
    match_state: Match,
    /// Where the current state came from ("manual" or a feed name)
    source: String,
    last_updated: Option<DateTime<Utc>>,
}

impl MatchSession {
    pub fn new(format: MatchFormat, team_a: Team, team_b: Team) -> Self {
        MatchSession::from_match(Match::new(format, team_a, team_b), "manual")
    }

    pub fn from_match(match_state: Match, source: impl Into<String>) -> Self {
        MatchSession {
            match_state,
            source: source.into(),
            last_updated: None,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn match_state(&self) -> &Match {
        &self.match_state
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Set a target for `side`, marking it as the chasing team.
    pub fn set_target(&mut self, side: TeamSide, target: u32) {
        let team = self.match_state.team_mut(side);
        team.target = Some(target);
        team.is_chasing = true;
    }

    /// Switch the batting side; the cursor moves to that side's last ball.
    pub fn set_current_team(&mut self, side: TeamSide) {
        self.match_state.current_team = side;
        self.match_state.current_ball = self.match_state.team(side).innings.len() as u32;
        info!("{} now batting", self.match_state.team(side).name);
    }

    /// Record a ball for the batting side and move the cursor to it.
    pub fn record_ball(
        &mut self,
        runs_this_ball: i32,
        cumulative_wickets: i32,
    ) -> Result<BallRecord, StatsError> {
        let format = self.match_state.format;
        let side = self.match_state.current_team;
        let record = stats::record_ball(
            self.match_state.team_mut(side),
            format,
            runs_this_ball,
            cumulative_wickets,
        )?;
        self.match_state.current_ball = record.absolute_ball_number;
        self.last_updated = Some(Utc::now());
        Ok(record)
    }

    /// Swap in a complete snapshot from a feed after validating it.
    /// Required rates are re-derived from the snapshot's targets and format.
    /// The previous state is kept if validation fails.
    pub fn replace_snapshot(
        &mut self,
        mut snapshot: Match,
        source: impl Into<String>,
    ) -> Result<(), StatsError> {
        snapshot.validate()?;
        snapshot.rederive_required_rates();
        self.match_state = snapshot;
        self.source = source.into();
        self.last_updated = Some(Utc::now());
        Ok(())
    }

    pub fn current_comparison(&self) -> ComparisonResult {
        stats::current_comparison(&self.match_state)
    }

    pub fn win_probability(&self, strategy: WinProbabilityStrategy) -> WinProbability {
        let cmp = self.current_comparison();
        stats::estimate_win_probability(cmp.team_a.as_ref(), cmp.team_b.as_ref(), strategy)
    }

    pub fn comparison_series(&self) -> Vec<SeriesRow> {
        stats::build_comparison_series(&self.match_state)
    }
}
