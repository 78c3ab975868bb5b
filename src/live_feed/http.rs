use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::Match;
use super::provider::MatchFeed;

/// Feed that GETs a JSON match snapshot from a fixed URL.
///
/// The body must be the serde form of [`Match`]. Innings are validated while
/// deserializing and the match-level invariants right after, so a malformed
/// snapshot never reaches the session.
pub struct HttpSnapshotFeed {
    http: Client,
    url: String,
}

impl HttpSnapshotFeed {
    pub fn new(url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpSnapshotFeed {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl MatchFeed for HttpSnapshotFeed {
    fn name(&self) -> &str {
        "HttpSnapshot"
    }

    async fn fetch_snapshot(&self) -> Result<Match> {
        debug!("Fetching match snapshot from {}", self.url);

        let resp = self.http.get(&self.url).send().await
            .context("Snapshot request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Snapshot feed error: {}", resp.status());
        }

        let body = resp.text().await
            .context("Failed to read snapshot body")?;

        parse_snapshot(&body)
    }
}

fn parse_snapshot(body: &str) -> Result<Match> {
    let mut snapshot: Match = serde_json::from_str(body)
        .context("Failed to parse match snapshot")?;
    snapshot.validate().context("Snapshot failed validation")?;
    snapshot.rederive_required_rates();
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchFormat, TeamSide};
    use serde_json::json;

    fn ball(n: u32, runs: u32, total: u32, wickets: u32) -> serde_json::Value {
        json!({
            "over": (n - 1) / 6 + 1,
            "ball_in_over": (n - 1) % 6 + 1,
            "absolute_ball_number": n,
            "runs_this_ball": runs,
            "cumulative_runs": total,
            "cumulative_wickets": wickets,
            "run_rate": total as f64 / n as f64 * 6.0
        })
    }

    fn snapshot(team_b_innings: Vec<serde_json::Value>, current_ball: u32) -> String {
        json!({
            "title": "England vs New Zealand - 2nd ODI",
            "format": "ODI",
            "team_a": {
                "name": "England",
                "short_name": "ENG",
                "innings": [ball(1, 1, 1, 0), ball(2, 4, 5, 0)]
            },
            "team_b": {
                "name": "New Zealand",
                "short_name": "NEW",
                "innings": team_b_innings,
                "target": 250,
                "is_chasing": true
            },
            "current_team": "b",
            "current_ball": current_ball,
            "status": "Live - 2nd Innings"
        })
        .to_string()
    }

    #[test]
    fn test_parse_valid_snapshot() {
        let body = snapshot(vec![ball(1, 0, 0, 0), ball(2, 2, 2, 0)], 2);
        let m = parse_snapshot(&body).unwrap();
        assert_eq!(m.format, MatchFormat::Odi);
        assert_eq!(m.current_team, TeamSide::B);
        assert_eq!(m.team_b.target, Some(250));
        assert_eq!(m.team_a.innings.total_runs(), 5);
    }

    #[test]
    fn test_parse_replaces_supplied_rates() {
        let mut first = ball(1, 4, 4, 0);
        first["run_rate"] = json!(999.0);
        first["required_run_rate"] = json!(-50.0);
        let body = snapshot(vec![first], 1);
        let m = parse_snapshot(&body).unwrap();
        let record = m.team_b.innings.get(1).unwrap();
        assert_eq!(record.run_rate, 24.0);
        // 246 needed off 299 balls of the ODI allowance
        assert_eq!(record.required_run_rate, Some(246.0 / 299.0 * 6.0));
    }

    #[test]
    fn test_parse_rejects_gap() {
        let body = snapshot(vec![ball(1, 0, 0, 0), ball(3, 2, 2, 0)], 2);
        assert!(parse_snapshot(&body).is_err());
    }

    #[test]
    fn test_parse_rejects_cursor_past_innings() {
        let body = snapshot(vec![ball(1, 0, 0, 0)], 9);
        assert!(parse_snapshot(&body).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let body = snapshot(vec![], 0).replace("\"ODI\"", "\"Hundred\"");
        assert!(parse_snapshot(&body).is_err());
    }

    #[test]
    fn test_parse_rejects_negative_runs() {
        let mut bad = ball(1, 0, 0, 0);
        bad["runs_this_ball"] = json!(-1);
        let body = snapshot(vec![bad], 1);
        assert!(parse_snapshot(&body).is_err());
    }
}
