//! Ball recorder: turns raw per-ball input into an appended [`BallRecord`].

use tracing::debug;

use crate::models::{BallRecord, MatchFormat, Team, BALLS_PER_OVER};

use super::{check_wickets, StatsError};

/// Over number and position within the over for a 1-based ball number.
///
/// Ball 7 is `(2, 1)`, ball 12 is `(2, 6)`.
pub fn over_and_ball(absolute_ball_number: u32) -> (u32, u32) {
    let n = absolute_ball_number.max(1) - 1;
    (n / BALLS_PER_OVER + 1, n % BALLS_PER_OVER + 1)
}

/// Runs per over after `balls` deliveries. Zero balls gives 0.0.
pub fn run_rate(cumulative_runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    cumulative_runs as f64 / balls as f64 * BALLS_PER_OVER as f64
}

/// Runs per over the chasing side needs over its remaining overs.
///
/// Returns `None` for unlimited formats and once no balls remain. A target
/// already reached needs 0.0 rather than a negative rate. This value feeds
/// the pressure term of the Live win probability strategy, so after a
/// completed chase that term reduces to minus the current run rate.
pub fn required_run_rate(
    target: u32,
    cumulative_runs: u32,
    balls_faced: u32,
    format: MatchFormat,
) -> Option<f64> {
    let total = format.total_balls()?;
    let remaining = total.checked_sub(balls_faced).filter(|r| *r > 0)?;
    let deficit = target.saturating_sub(cumulative_runs);
    Some(deficit as f64 / remaining as f64 * BALLS_PER_OVER as f64)
}

/// Record one delivery for `team`.
///
/// `cumulative_wickets` is the innings total after this ball, not the
/// wickets that fell on it. Input is validated before anything is appended:
/// negative runs, wickets outside 0..=10 or below the previous count, an
/// all-out innings and an exhausted ball allowance are all rejected.
pub fn record_ball(
    team: &mut Team,
    format: MatchFormat,
    runs_this_ball: i32,
    cumulative_wickets: i32,
) -> Result<BallRecord, StatsError> {
    let innings = &team.innings;
    if innings.is_all_out() {
        return Err(StatsError::InningsComplete(format!(
            "{} are all out",
            team.name
        )));
    }
    let n = innings.next_ball_number();
    if let Some(allowance) = format.total_balls() {
        if n > allowance {
            return Err(StatsError::InningsComplete(format!(
                "{} have faced all {} balls of the {} format",
                team.name, allowance, format
            )));
        }
    }
    if runs_this_ball < 0 {
        return Err(StatsError::InvalidInput(format!(
            "runs cannot be negative, got {}",
            runs_this_ball
        )));
    }
    let wickets = check_wickets(cumulative_wickets as i64, innings.wickets())?;

    let runs = runs_this_ball as u32;
    let cumulative_runs = innings.total_runs().checked_add(runs).ok_or_else(|| {
        StatsError::InvalidInput(format!(
            "{} runs would overflow the innings total of {}",
            runs,
            innings.total_runs()
        ))
    })?;
    let (over, ball_in_over) = over_and_ball(n);
    let required = team
        .target
        .and_then(|target| required_run_rate(target, cumulative_runs, n, format));

    let record = BallRecord {
        over,
        ball_in_over,
        absolute_ball_number: n,
        runs_this_ball: runs,
        cumulative_runs,
        cumulative_wickets: wickets,
        run_rate: run_rate(cumulative_runs, n),
        required_run_rate: required,
    };
    team.innings.append_record(record.clone())?;
    debug!(
        "{} {}: {} run(s), {}/{}",
        team.short_name,
        record.over_ball(),
        runs,
        cumulative_runs,
        wickets
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record_all(team: &mut Team, format: MatchFormat, balls: &[(i32, i32)]) {
        for &(runs, wickets) in balls {
            record_ball(team, format, runs, wickets).expect("valid ball");
        }
    }

    #[test]
    fn test_over_and_ball() {
        assert_eq!(over_and_ball(1), (1, 1));
        assert_eq!(over_and_ball(6), (1, 6));
        assert_eq!(over_and_ball(7), (2, 1));
        assert_eq!(over_and_ball(12), (2, 6));
        assert_eq!(over_and_ball(75), (13, 3));
    }

    #[test]
    fn test_first_over_scenario() {
        let mut team = Team::new("India");
        let runs = [1, 4, 0, 6, 2, 1];
        record_all(&mut team, MatchFormat::Odi, &runs.map(|r| (r, 0)));

        let totals: Vec<u32> = team.innings.records().iter().map(|r| r.cumulative_runs).collect();
        assert_eq!(totals, vec![1, 5, 5, 11, 13, 14]);
        let last = team.innings.last().unwrap();
        assert_eq!((last.over, last.ball_in_over), (1, 6));
        assert_relative_eq!(last.run_rate, 14.0, epsilon = 1e-9);
        assert!(last.required_run_rate.is_none());
    }

    #[test]
    fn test_run_rate_after_two_overs() {
        assert_relative_eq!(run_rate(21, 12), 10.5, epsilon = 1e-9);
        assert_relative_eq!(run_rate(14, 6), 14.0, epsilon = 1e-9);
        assert_relative_eq!(run_rate(0, 0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ball_numbers_are_contiguous() {
        let mut team = Team::new("Australia");
        for i in 0..40 {
            record_ball(&mut team, MatchFormat::T20, i % 3, 0).unwrap();
        }
        let numbers: Vec<u32> = team
            .innings
            .records()
            .iter()
            .map(|r| r.absolute_ball_number)
            .collect();
        assert_eq!(numbers, (1..=40).collect::<Vec<_>>());
    }

    #[test]
    fn test_required_run_rate_t20() {
        // 185 to chase, 60 off the first 60 balls: 125 needed off 60 balls
        let mut team = Team::new("Australia").chasing(185);
        for _ in 0..60 {
            record_ball(&mut team, MatchFormat::T20, 1, 0).unwrap();
        }
        let last = team.innings.last().unwrap();
        assert_relative_eq!(last.required_run_rate.unwrap(), 12.5, epsilon = 1e-9);
    }

    #[test]
    fn test_required_run_rate_edges() {
        // Target already passed
        assert_relative_eq!(
            required_run_rate(100, 120, 60, MatchFormat::T20).unwrap(),
            0.0,
            epsilon = 1e-9
        );
        // Last ball of the innings
        assert!(required_run_rate(100, 50, 120, MatchFormat::T20).is_none());
        // Unlimited format
        assert!(required_run_rate(100, 50, 60, MatchFormat::Test).is_none());
        // ODI: 250 to chase, 21 after 12 balls: 229 off 288
        assert_relative_eq!(
            required_run_rate(250, 21, 12, MatchFormat::Odi).unwrap(),
            229.0 / 288.0 * 6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rejects_negative_runs() {
        let mut team = Team::new("India");
        let err = record_ball(&mut team, MatchFormat::T20, -1, 0).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert!(team.innings.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_wickets() {
        let mut team = Team::new("India");
        assert!(matches!(
            record_ball(&mut team, MatchFormat::T20, 0, 11),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            record_ball(&mut team, MatchFormat::T20, 0, -1),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(team.innings.is_empty());
    }

    #[test]
    fn test_rejects_decreasing_wickets() {
        let mut team = Team::new("India");
        record_ball(&mut team, MatchFormat::T20, 0, 2).unwrap();
        let err = record_ball(&mut team, MatchFormat::T20, 0, 1).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert_eq!(team.innings.len(), 1);
    }

    #[test]
    fn test_rejects_after_all_out() {
        let mut team = Team::new("India");
        record_ball(&mut team, MatchFormat::T20, 4, 9).unwrap();
        record_ball(&mut team, MatchFormat::T20, 0, 10).unwrap();
        let err = record_ball(&mut team, MatchFormat::T20, 1, 10).unwrap_err();
        assert!(matches!(err, StatsError::InningsComplete(_)));
        assert_eq!(team.innings.len(), 2);
    }

    #[test]
    fn test_rejects_past_ball_allowance() {
        let mut team = Team::new("India");
        for _ in 0..6 {
            record_ball(&mut team, MatchFormat::Custom(1), 1, 0).unwrap();
        }
        let err = record_ball(&mut team, MatchFormat::Custom(1), 1, 0).unwrap_err();
        assert!(matches!(err, StatsError::InningsComplete(_)));
    }

    #[test]
    fn test_rejects_runs_overflowing_total() {
        let mut team = Team::new("India");
        record_ball(&mut team, MatchFormat::T20, i32::MAX, 0).unwrap();
        record_ball(&mut team, MatchFormat::T20, i32::MAX, 0).unwrap();
        let err = record_ball(&mut team, MatchFormat::T20, i32::MAX, 0).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert_eq!(team.innings.len(), 2);
        assert_eq!(team.innings.total_runs(), 2 * i32::MAX as u32);
    }

    #[test]
    fn test_totals_never_decrease() {
        let mut team = Team::new("India");
        let balls = [(1, 0), (0, 1), (6, 1), (0, 2), (4, 2), (2, 3)];
        record_all(&mut team, MatchFormat::T20, &balls);
        for pair in team.innings.records().windows(2) {
            assert!(pair[1].cumulative_runs >= pair[0].cumulative_runs);
            assert!(pair[1].cumulative_wickets >= pair[0].cumulative_wickets);
        }
    }
}
