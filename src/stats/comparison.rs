//! Same-stage comparison of the two innings.

use serde::Serialize;

use crate::models::{BallRecord, Innings, Match};

/// Which side is ahead on runs at a given ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    TeamA,
    TeamB,
    Tied,
    /// At least one side has not reached the ball yet
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// 1-based ball number both innings were read at
    pub ball_index: u32,
    pub team_a: Option<BallRecord>,
    pub team_b: Option<BallRecord>,
    pub advantage: Advantage,
}

/// Read both innings at the same ball number and label the runs leader.
///
/// Only cumulative runs decide the advantage; wickets are left to the win
/// probability estimate. An index past either innings is not an error, that
/// side is simply absent.
pub fn compare_at(innings_a: &Innings, innings_b: &Innings, ball_index: u32) -> ComparisonResult {
    let team_a = innings_a.get(ball_index).cloned();
    let team_b = innings_b.get(ball_index).cloned();

    let advantage = match (&team_a, &team_b) {
        (Some(a), Some(b)) if a.cumulative_runs > b.cumulative_runs => Advantage::TeamA,
        (Some(a), Some(b)) if b.cumulative_runs > a.cumulative_runs => Advantage::TeamB,
        (Some(_), Some(_)) => Advantage::Tied,
        _ => Advantage::Undetermined,
    };

    ComparisonResult {
        ball_index,
        team_a,
        team_b,
        advantage,
    }
}

/// Comparison at the match cursor.
pub fn current_comparison(m: &Match) -> ComparisonResult {
    compare_at(&m.team_a.innings, &m.team_b.innings, m.current_ball)
}
