//! Synthetic innings for demos and tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::debug;

use crate::models::{Match, MatchFormat, Team, TeamSide, MAX_WICKETS};
use crate::stats::{record_ball, StatsError};

use super::provider::MatchFeed;

/// Chance of a wicket on any ball.
const WICKET_PROBABILITY: f64 = 0.05;

/// Cumulative run-outcome weights: 30% dot, 20% single, 20% two,
/// 15% four, 15% six.
const RUN_OUTCOMES: [(f64, i32); 5] = [(0.30, 0), (0.50, 1), (0.70, 2), (0.85, 4), (1.0, 6)];

/// Weighted-random ball generator. Every ball goes through the recorder, so
/// generated innings satisfy the same invariants as manual entry.
pub struct MockInningsGenerator {
    rng: StdRng,
}

impl MockInningsGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        MockInningsGenerator { rng }
    }

    fn next_runs(&mut self) -> i32 {
        let roll: f64 = self.rng.gen();
        RUN_OUTCOMES
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .map(|(_, runs)| *runs)
            .unwrap_or(6)
    }

    /// Append up to `balls` deliveries to `team`, stopping early when the
    /// innings completes (all out or out of balls).
    pub fn generate(&mut self, team: &mut Team, format: MatchFormat, balls: u32) -> Result<(), StatsError> {
        let mut wickets = team.innings.wickets();
        for _ in 0..balls {
            let mut runs = self.next_runs();
            if self.rng.gen_bool(WICKET_PROBABILITY) && wickets < MAX_WICKETS {
                wickets += 1;
                runs = 0;
            }
            match record_ball(team, format, runs, wickets as i32) {
                Ok(_) => {}
                Err(StatsError::InningsComplete(reason)) => {
                    debug!("Mock innings for {} ended early: {}", team.name, reason);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Feed that regenerates a fresh two-innings match on every poll: team A
/// bats first, team B chases.
pub struct MockMatchFeed {
    format: MatchFormat,
    team_a: String,
    team_b: String,
    balls: u32,
    /// Fixed target for team B; otherwise team A's total + 1
    target: Option<u32>,
    generator: Mutex<MockInningsGenerator>,
}

impl MockMatchFeed {
    pub fn new(
        format: MatchFormat,
        team_a: &str,
        team_b: &str,
        balls: u32,
        target: Option<u32>,
        seed: Option<u64>,
    ) -> Self {
        MockMatchFeed {
            format,
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            balls,
            target,
            generator: Mutex::new(MockInningsGenerator::new(seed)),
        }
    }

    fn build_match(&self) -> Result<Match> {
        let mut generator = self
            .generator
            .lock()
            .map_err(|_| anyhow!("mock generator lock poisoned"))?;

        let mut team_a = Team::new(&self.team_a);
        generator.generate(&mut team_a, self.format, self.balls)?;

        let target = self.target.unwrap_or(team_a.innings.total_runs() + 1);
        let mut team_b = Team::new(&self.team_b).chasing(target);
        generator.generate(&mut team_b, self.format, self.balls)?;

        let mut m = Match::new(self.format, team_a, team_b);
        m.title = format!("{} vs {} - {}", self.team_a, self.team_b, self.format);
        m.current_team = TeamSide::B;
        m.current_ball = m.team_b.innings.len() as u32;
        m.status = "Live - 2nd Innings".to_string();
        Ok(m)
    }
}

#[async_trait]
impl MatchFeed for MockMatchFeed {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn fetch_snapshot(&self) -> Result<Match> {
        self.build_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_innings_is_valid() {
        let mut generator = MockInningsGenerator::new(Some(7));
        for _ in 0..20 {
            let mut team = Team::new("India");
            generator.generate(&mut team, MatchFormat::T20, 120).unwrap();
            let records = team.innings.records();
            assert!(!records.is_empty());
            assert!(records.len() <= 120);
            for (i, r) in records.iter().enumerate() {
                assert_eq!(r.absolute_ball_number, i as u32 + 1);
                assert!(r.cumulative_wickets <= MAX_WICKETS);
                assert!(matches!(r.runs_this_ball, 0 | 1 | 2 | 4 | 6));
            }
            // Round trip through the validating constructor
            let rebuilt = crate::models::Innings::from_records(records.to_vec()).unwrap();
            assert_eq!(rebuilt, team.innings);
        }
    }

    #[test]
    fn test_generation_stops_at_all_out() {
        let mut generator = MockInningsGenerator::new(Some(1));
        let mut team = Team::new("India");
        // Test format has no ball allowance; a long innings must end all out
        generator.generate(&mut team, MatchFormat::Test, 5_000).unwrap();
        assert!(team.innings.is_all_out());
        assert!(team.innings.len() < 5_000);
    }

    #[test]
    fn test_generation_respects_ball_allowance() {
        let mut generator = MockInningsGenerator::new(Some(3));
        let mut team = Team::new("India");
        generator.generate(&mut team, MatchFormat::Custom(2), 50).unwrap();
        assert!(team.innings.len() <= 12);
    }

    #[test]
    fn test_seeded_feed_is_reproducible() {
        let a = MockMatchFeed::new(MatchFormat::T20, "India", "Australia", 75, None, Some(42));
        let b = MockMatchFeed::new(MatchFormat::T20, "India", "Australia", 75, None, Some(42));
        assert_eq!(a.build_match().unwrap(), b.build_match().unwrap());
    }

    #[tokio::test]
    async fn test_mock_snapshot_shape() {
        let feed = MockMatchFeed::new(MatchFormat::T20, "India", "Australia", 75, Some(185), Some(9));
        let m = feed.fetch_snapshot().await.unwrap();
        assert_eq!(m.current_team, TeamSide::B);
        assert_eq!(m.current_ball as usize, m.team_b.innings.len());
        assert_eq!(m.team_b.target, Some(185));
        assert!(m.team_b.is_chasing);
        assert!(m.team_a.target.is_none());
        assert!(m.validate().is_ok());
        if let Some(first) = m.team_b.innings.get(1) {
            assert!(first.required_run_rate.is_some());
        }
    }
}
