//! Ball-aligned rows for side-by-side charting of both innings.

use serde::Serialize;

use crate::models::{BallRecord, Match};

use super::over_and_ball;

/// One team's figures at a ball; zeros when the team has not reached it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SeriesPoint {
    pub total_runs: u32,
    pub wickets: u32,
    pub run_rate: f64,
}

impl From<Option<&BallRecord>> for SeriesPoint {
    fn from(record: Option<&BallRecord>) -> Self {
        record
            .map(|r| SeriesPoint {
                total_runs: r.cumulative_runs,
                wickets: r.cumulative_wickets,
                run_rate: r.run_rate,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub ball_number: u32,
    pub over: u32,
    pub ball_in_over: u32,
    pub over_ball: String,
    pub team_a: SeriesPoint,
    pub team_b: SeriesPoint,
    /// Team B's required rate at this ball, 0.0 when absent
    pub team_b_required_rate: f64,
}

/// One row per ball from 1 to the longer innings, in ball order.
pub fn build_comparison_series(m: &Match) -> Vec<SeriesRow> {
    let innings_a = &m.team_a.innings;
    let innings_b = &m.team_b.innings;
    let longest = innings_a.len().max(innings_b.len()) as u32;

    (1..=longest)
        .map(|n| {
            let a = innings_a.get(n);
            let b = innings_b.get(n);
            let (over, ball_in_over) = over_and_ball(n);
            SeriesRow {
                ball_number: n,
                over,
                ball_in_over,
                over_ball: format!("{}.{}", over, ball_in_over),
                team_a: a.into(),
                team_b: b.into(),
                team_b_required_rate: b.and_then(|r| r.required_run_rate).unwrap_or(0.0),
            }
        })
        .collect()
}
