use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::stats::StatsError;

/// Legal deliveries per over.
pub const BALLS_PER_OVER: u32 = 6;
/// Wickets that end an innings (all out).
pub const MAX_WICKETS: u32 = 10;
/// Longest custom format whose ball allowance still fits in a `u32`.
pub const MAX_CUSTOM_OVERS: u32 = u32::MAX / BALLS_PER_OVER;

/// Match format. The overs limit drives required run rate and the ball
/// allowance of each innings; `Test` has no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatchFormat {
    T20,
    Odi,
    Test,
    Custom(u32),
}

impl MatchFormat {
    /// Overs per innings, `None` for unlimited formats.
    pub fn total_overs(self) -> Option<u32> {
        match self {
            MatchFormat::T20 => Some(20),
            MatchFormat::Odi => Some(50),
            MatchFormat::Test => None,
            MatchFormat::Custom(overs) => Some(overs),
        }
    }

    /// Legal deliveries per innings, `None` for unlimited formats.
    pub fn total_balls(self) -> Option<u32> {
        self.total_overs()
            .and_then(|overs| overs.checked_mul(BALLS_PER_OVER))
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFormat::T20 => write!(f, "T20"),
            MatchFormat::Odi => write!(f, "ODI"),
            MatchFormat::Test => write!(f, "Test"),
            MatchFormat::Custom(overs) => write!(f, "{}", overs),
        }
    }
}

impl FromStr for MatchFormat {
    type Err = String;

    /// Accepts `T20`, `ODI`, `Test` (any case) or an overs count in
    /// `1..=MAX_CUSTOM_OVERS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t20" | "t20i" => Ok(MatchFormat::T20),
            "odi" => Ok(MatchFormat::Odi),
            "test" => Ok(MatchFormat::Test),
            other => match other.parse::<u32>() {
                Ok(overs) if (1..=MAX_CUSTOM_OVERS).contains(&overs) => {
                    Ok(MatchFormat::Custom(overs))
                }
                _ => Err(format!(
                    "unknown match format '{}': expected T20, ODI, Test or an overs count",
                    s
                )),
            },
        }
    }
}

impl TryFrom<String> for MatchFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchFormat> for String {
    fn from(format: MatchFormat) -> Self {
        format.to_string()
    }
}

/// One delivery's outcome for one team's innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    /// 1-based over number
    pub over: u32,
    /// Position within the over, 1..=6
    pub ball_in_over: u32,
    /// 1-based delivery count within the innings
    pub absolute_ball_number: u32,
    pub runs_this_ball: u32,
    pub cumulative_runs: u32,
    pub cumulative_wickets: u32,
    /// Runs per over so far
    pub run_rate: f64,
    /// Runs per over needed to reach the target; only set when chasing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_run_rate: Option<f64>,
}

impl BallRecord {
    /// Scoreboard label such as `"12.3"`.
    pub fn over_ball(&self) -> String {
        format!("{}.{}", self.over, self.ball_in_over)
    }
}

/// Append-only, chronologically ordered ball log for one team.
///
/// Ball numbers are always exactly `1..=len()`; deserialized innings are
/// validated the same way as records appended one at a time. The run rate
/// is re-derived on append; the required rate depends on the team target
/// and format, so [`Match::rederive_required_rates`] owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BallRecord>", into = "Vec<BallRecord>")]
pub struct Innings {
    records: Vec<BallRecord>,
}

impl Innings {
    pub fn new() -> Self {
        Innings::default()
    }

    /// Build an innings from an externally supplied sequence, validating
    /// every record in order.
    pub fn from_records(records: Vec<BallRecord>) -> Result<Self, StatsError> {
        let mut innings = Innings::new();
        for record in records {
            innings.append_record(record)?;
        }
        Ok(innings)
    }

    pub fn records(&self) -> &[BallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&BallRecord> {
        self.records.last()
    }

    /// Record at a 1-based ball number, `None` for 0 or beyond the log.
    pub fn get(&self, ball_number: u32) -> Option<&BallRecord> {
        let idx = (ball_number as usize).checked_sub(1)?;
        self.records.get(idx)
    }

    pub fn total_runs(&self) -> u32 {
        self.last().map(|r| r.cumulative_runs).unwrap_or(0)
    }

    pub fn wickets(&self) -> u32 {
        self.last().map(|r| r.cumulative_wickets).unwrap_or(0)
    }

    pub fn is_all_out(&self) -> bool {
        self.wickets() >= MAX_WICKETS
    }

    /// Number the next delivery will carry.
    pub fn next_ball_number(&self) -> u32 {
        self.records.len() as u32 + 1
    }

    /// Append a record produced elsewhere (feed ingestion, manual entry).
    /// The record must continue the sequence exactly; nothing is appended
    /// on error. A supplied run rate is replaced by the derived one.
    pub fn append_record(&mut self, mut record: BallRecord) -> Result<(), StatsError> {
        let expected = self.next_ball_number();
        if record.absolute_ball_number != expected {
            return Err(StatsError::SequenceGap {
                expected,
                actual: record.absolute_ball_number,
            });
        }
        if self.is_all_out() {
            return Err(StatsError::InningsComplete(format!(
                "all out after {} balls",
                self.len()
            )));
        }
        let (over, ball_in_over) = crate::stats::over_and_ball(expected);
        if record.over != over || record.ball_in_over != ball_in_over {
            return Err(StatsError::InvalidInput(format!(
                "ball {} must be {}.{}, got {}",
                expected,
                over,
                ball_in_over,
                record.over_ball()
            )));
        }
        let total = self
            .total_runs()
            .checked_add(record.runs_this_ball)
            .ok_or_else(|| {
                StatsError::InvalidInput(format!(
                    "ball {}: {} runs overflow the innings total",
                    expected, record.runs_this_ball
                ))
            })?;
        if record.cumulative_runs != total {
            return Err(StatsError::InvalidInput(format!(
                "ball {}: cumulative runs {} != {} + {}",
                expected,
                record.cumulative_runs,
                self.total_runs(),
                record.runs_this_ball
            )));
        }
        crate::stats::check_wickets(record.cumulative_wickets as i64, self.wickets())?;

        record.run_rate = crate::stats::run_rate(record.cumulative_runs, expected);
        self.records.push(record);
        Ok(())
    }

    /// Recompute every record's required rate for the given target.
    fn rederive_required_rates(&mut self, target: Option<u32>, format: MatchFormat) {
        for record in &mut self.records {
            record.required_run_rate = target.and_then(|target| {
                crate::stats::required_run_rate(
                    target,
                    record.cumulative_runs,
                    record.absolute_ball_number,
                    format,
                )
            });
        }
    }
}

impl TryFrom<Vec<BallRecord>> for Innings {
    type Error = StatsError;

    fn try_from(records: Vec<BallRecord>) -> Result<Self, Self::Error> {
        Innings::from_records(records)
    }
}

impl From<Innings> for Vec<BallRecord> {
    fn from(innings: Innings) -> Self {
        innings.records
    }
}

/// Which of the two teams in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub innings: Innings,
    /// Score to reach when batting second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(default)]
    pub is_chasing: bool,
}

impl Team {
    /// New team with an empty innings; the short name is the first three
    /// characters of the name, upper-cased.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let short_name = name.chars().take(3).collect::<String>().to_uppercase();
        Team {
            name,
            short_name,
            innings: Innings::new(),
            target: None,
            is_chasing: false,
        }
    }

    pub fn chasing(mut self, target: u32) -> Self {
        self.target = Some(target);
        self.is_chasing = true;
        self
    }
}

/// Two teams, the side currently batting and the comparison cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub title: String,
    pub format: MatchFormat,
    pub team_a: Team,
    pub team_b: Team,
    pub current_team: TeamSide,
    /// 1-based ball number used to align both innings; 0 before any ball
    pub current_ball: u32,
    #[serde(default)]
    pub status: String,
}

impl Match {
    pub fn new(format: MatchFormat, team_a: Team, team_b: Team) -> Self {
        let title = format!("{} vs {}", team_a.name, team_b.name);
        Match {
            title,
            format,
            team_a,
            team_b,
            current_team: TeamSide::A,
            current_ball: 0,
            status: "Not started".to_string(),
        }
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }

    /// Replace any supplied required run rates with ones derived from each
    /// team's target and the match format. Teams without a target get none.
    pub fn rederive_required_rates(&mut self) {
        let format = self.format;
        for team in [&mut self.team_a, &mut self.team_b] {
            team.innings.rederive_required_rates(team.target, format);
        }
    }

    /// Checks the match-level invariants innings deserialization cannot:
    /// the format's ball allowance and the cursor range.
    pub fn validate(&self) -> Result<(), StatsError> {
        if let Some(allowance) = self.format.total_balls() {
            for team in [&self.team_a, &self.team_b] {
                if team.innings.len() as u32 > allowance {
                    return Err(StatsError::InningsComplete(format!(
                        "{} has {} balls, {} format allows {}",
                        team.name,
                        team.innings.len(),
                        self.format,
                        allowance
                    )));
                }
            }
        }
        let longest = self.team_a.innings.len().max(self.team_b.innings.len()) as u32;
        if self.current_ball > longest {
            return Err(StatsError::InvalidInput(format!(
                "cursor at ball {} but longest innings has {}",
                self.current_ball, longest
            )));
        }
        Ok(())
    }
}
