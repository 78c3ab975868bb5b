//! Heuristic win probability at a same-stage comparison point.
//!
//! These are deterministic scoring functions, not calibrated models. Two
//! policies are available and selected explicitly:
//! - **Simple**: runs and wickets only, bounded to [10, 90].
//! - **Live**: heavier wicket weight plus required-rate pressure on the
//!   chasing side (team B), bounded to [5, 95].
//!
//! Team A's share is rounded half-up, and team B's share `100 - p` is rounded
//! half-up on its own, so the two may sum to 101.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::BallRecord;

/// Neutral split when either side has no record at the comparison point.
const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinProbabilityStrategy {
    Simple,
    Live,
}

impl fmt::Display for WinProbabilityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinProbabilityStrategy::Simple => write!(f, "simple"),
            WinProbabilityStrategy::Live => write!(f, "live"),
        }
    }
}

impl FromStr for WinProbabilityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(WinProbabilityStrategy::Simple),
            "live" => Ok(WinProbabilityStrategy::Live),
            _ => Err(format!(
                "unknown win probability strategy '{}': expected simple or live",
                s
            )),
        }
    }
}

/// Whole-percent split between the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WinProbability {
    pub team_a: u32,
    pub team_b: u32,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Estimate team A's and team B's chances from their records at the same
/// ball. Never fails: a missing record yields 50/50, extreme inputs clamp.
pub fn estimate_win_probability(
    record_a: Option<&BallRecord>,
    record_b: Option<&BallRecord>,
    strategy: WinProbabilityStrategy,
) -> WinProbability {
    let p = match (record_a, record_b) {
        (Some(a), Some(b)) => match strategy {
            WinProbabilityStrategy::Simple => simple_probability(a, b),
            WinProbabilityStrategy::Live => live_probability(a, b),
        },
        _ => NEUTRAL,
    };

    WinProbability {
        team_a: round_half_up(p),
        team_b: round_half_up(100.0 - p),
    }
}

// ── Simple ───────────────────────────────────────────────────────────────────

const SIMPLE_RUN_WEIGHT: f64 = 2.0;
const SIMPLE_WICKET_WEIGHT: f64 = 5.0;
const SIMPLE_BOUNDS: (f64, f64) = (10.0, 90.0);

fn simple_probability(a: &BallRecord, b: &BallRecord) -> f64 {
    let p = NEUTRAL
        + run_diff(a, b) * SIMPLE_RUN_WEIGHT
        + wicket_diff(a, b) * SIMPLE_WICKET_WEIGHT;
    p.clamp(SIMPLE_BOUNDS.0, SIMPLE_BOUNDS.1)
}

// ── Live ─────────────────────────────────────────────────────────────────────
//
// A chasing side whose required rate exceeds its current rate is under
// pressure, which pushes the estimate towards team A.

const LIVE_RUN_WEIGHT: f64 = 1.5;
const LIVE_WICKET_WEIGHT: f64 = 8.0;
const LIVE_RATE_PRESSURE_WEIGHT: f64 = 3.0;
const LIVE_BOUNDS: (f64, f64) = (5.0, 95.0);

fn live_probability(a: &BallRecord, b: &BallRecord) -> f64 {
    let required = b.required_run_rate.unwrap_or(0.0);
    let pressure = required - b.run_rate;
    let p = NEUTRAL
        + run_diff(a, b) * LIVE_RUN_WEIGHT
        + wicket_diff(a, b) * LIVE_WICKET_WEIGHT
        + pressure * LIVE_RATE_PRESSURE_WEIGHT;
    if p.is_nan() {
        return NEUTRAL;
    }
    p.clamp(LIVE_BOUNDS.0, LIVE_BOUNDS.1)
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn run_diff(a: &BallRecord, b: &BallRecord) -> f64 {
    a.cumulative_runs as f64 - b.cumulative_runs as f64
}

/// Positive when team B has lost more wickets.
fn wicket_diff(a: &BallRecord, b: &BallRecord) -> f64 {
    b.cumulative_wickets as f64 - a.cumulative_wickets as f64
}

fn round_half_up(p: f64) -> u32 {
    (p + 0.5).floor().max(0.0) as u32
}
