//! Ball-by-ball match statistics.
//!
//! Everything here is synchronous and pure apart from the append performed by
//! [`record_ball`]. Statistics are recomputed from the innings on every read;
//! nothing is cached between calls.

pub mod comparison;
pub mod recorder;
pub mod series;
pub mod win_probability;

pub use comparison::{current_comparison, ComparisonResult};
pub use recorder::{over_and_ball, record_ball, required_run_rate, run_rate};
pub use series::{build_comparison_series, SeriesRow};
pub use win_probability::{estimate_win_probability, WinProbability, WinProbabilityStrategy};

use thiserror::Error;

use crate::models::MAX_WICKETS;

/// Rejections raised at the recording boundary. No state is mutated when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("sequence gap: expected ball {expected}, got {actual}")]
    SequenceGap { expected: u32, actual: u32 },
    #[error("innings complete: {0}")]
    InningsComplete(String),
}

/// Validate a cumulative wicket count against the range and the previous
/// count of the same innings.
pub(crate) fn check_wickets(wickets: i64, previous: u32) -> Result<u32, StatsError> {
    if !(0..=MAX_WICKETS as i64).contains(&wickets) {
        return Err(StatsError::InvalidInput(format!(
            "wickets must be between 0 and {}, got {}",
            MAX_WICKETS, wickets
        )));
    }
    let wickets = wickets as u32;
    if wickets < previous {
        return Err(StatsError::InvalidInput(format!(
            "wickets cannot fall from {} to {}",
            previous, wickets
        )));
    }
    Ok(wickets)
}
