//! Period sub-scores and goal tallies.
//!
//! Stores hand the engine whatever they recorded for each period: usually a
//! number, sometimes text typed by an operator. [`PeriodScore`] keeps both
//! shapes and [`tally`] folds a side's sub-scores into regulation goals and
//! an optional shootout total under a [`RegulationRule`].

use serde::{Deserialize, Serialize};

use crate::config::RegulationRule;
use crate::error::ScoreError;

/// Largest goal count a single period sub-score may hold.
pub const MAX_PERIOD_GOALS: u32 = 999;

/// One period sub-score as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodScore {
    /// A numeric value.
    Number(i64),
    /// Free text; parsed leniently.
    Text(String),
}

impl PeriodScore {
    /// Reads the sub-score as a goal count.
    ///
    /// Surrounding whitespace is ignored and blank text counts as zero (a
    /// period that was not played).
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] for negative numbers, for values above
    /// [`MAX_PERIOD_GOALS`] and for text that is not an integer.
    pub fn goals(&self) -> Result<u32, ScoreError> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                trimmed
                    .parse::<i64>()
                    .map_err(|_| ScoreError::Unparseable(raw.clone()))?
            }
        };
        if n < 0 {
            return Err(ScoreError::Negative(n));
        }
        match u32::try_from(n) {
            Ok(goals) if goals <= MAX_PERIOD_GOALS => Ok(goals),
            _ => Err(ScoreError::OutOfRange(n)),
        }
    }
}

impl From<u32> for PeriodScore {
    fn from(goals: u32) -> Self {
        Self::Number(i64::from(goals))
    }
}

impl From<&str> for PeriodScore {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

/// One side's sub-scores folded into totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Tally {
    /// Goals from regulation periods.
    pub regulation: u32,
    /// Shootout goals, when the sequence reaches the shootout boundary.
    pub shootout: Option<u32>,
    /// Sub-scores that could not be read, by period index. Each counted as 0.
    pub malformed: Vec<(usize, ScoreError)>,
}

impl Tally {
    /// Regulation and shootout goals together, for deciding a winner.
    #[must_use]
    pub fn deciding_total(&self) -> u32 {
        self.regulation.saturating_add(self.shootout.unwrap_or(0))
    }
}

/// Folds a side's sub-scores under `rule`.
#[must_use]
pub fn tally(periods: &[PeriodScore], rule: &RegulationRule) -> Tally {
    let mut out = Tally::default();
    for (index, period) in periods.iter().enumerate() {
        let goals = match period.goals() {
            Ok(goals) => goals,
            Err(err) => {
                out.malformed.push((index, err));
                0
            }
        };
        if rule.is_regulation(index) {
            out.regulation = out.regulation.saturating_add(goals);
        } else {
            let shootout = out.shootout.get_or_insert(0);
            *shootout = shootout.saturating_add(goals);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods(values: &[&str]) -> Vec<PeriodScore> {
        values.iter().map(|v| PeriodScore::from(*v)).collect()
    }

    #[test]
    fn text_scores_parse_leniently() {
        assert_eq!(PeriodScore::from(" 2 ").goals(), Ok(2));
        assert_eq!(PeriodScore::from("").goals(), Ok(0));
        assert_eq!(PeriodScore::from("-1").goals(), Err(ScoreError::Negative(-1)));
        assert_eq!(
            PeriodScore::from("2x").goals(),
            Err(ScoreError::Unparseable("2x".into()))
        );
        assert_eq!(PeriodScore::Number(-3).goals(), Err(ScoreError::Negative(-3)));
    }

    #[test]
    fn oversized_scores_are_rejected() {
        assert_eq!(PeriodScore::Number(999).goals(), Ok(999));
        assert_eq!(
            PeriodScore::Number(1000).goals(),
            Err(ScoreError::OutOfRange(1000))
        );
        assert_eq!(
            PeriodScore::from("99999999999").goals(),
            Err(ScoreError::OutOfRange(99_999_999_999))
        );

        let scores = vec![PeriodScore::Number(4_000_000_000); 2];
        let t = tally(&scores, &RegulationRule::all_periods());
        assert_eq!(t.regulation, 0);
        assert_eq!(t.malformed.len(), 2);
    }

    #[test]
    fn all_periods_count_without_boundary() {
        let t = tally(&periods(&["1", "0", "2"]), &RegulationRule::all_periods());
        assert_eq!(t.regulation, 3);
        assert_eq!(t.shootout, None);
        assert!(t.malformed.is_empty());
    }

    #[test]
    fn shootout_is_kept_apart() {
        // two halves, two extra-time halves, penalties
        let scores = periods(&["1", "0", "0", "0", "4"]);
        let t = tally(&scores, &RegulationRule::shootout_from(4));
        assert_eq!(t.regulation, 1);
        assert_eq!(t.shootout, Some(4));
        assert_eq!(t.deciding_total(), 5);
    }

    #[test]
    fn short_sequence_has_no_shootout() {
        let t = tally(&periods(&["1", "1"]), &RegulationRule::shootout_from(4));
        assert_eq!(t.regulation, 2);
        assert_eq!(t.shootout, None);
    }

    #[test]
    fn malformed_counts_as_zero() {
        let t = tally(&periods(&["2", "??", "1"]), &RegulationRule::all_periods());
        assert_eq!(t.regulation, 3);
        assert_eq!(t.malformed, vec![(1, ScoreError::Unparseable("??".into()))]);
    }

    #[test]
    fn deserializes_numbers_and_text() {
        let scores: Vec<PeriodScore> = serde_json::from_str(r#"[1, "2", " "]"#).unwrap();
        assert_eq!(
            scores,
            vec![
                PeriodScore::Number(1),
                PeriodScore::Text("2".into()),
                PeriodScore::Text(" ".into()),
            ]
        );
    }
}
