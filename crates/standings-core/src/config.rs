//! Tournament configuration consumed by the engine.
//!
//! All types deserialize with per-field defaults, so a tournament only has to
//! spell out what differs from the common football-style setup:
//!
//! ```
//! use standings_core::config::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(
//!     r#"{ "points": { "win": 2, "draw": 1, "loss": 0 } }"#,
//! ).unwrap();
//! assert_eq!(config.points.win, 2);
//! assert_eq!(config.walkover.winner_goals, 3);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ranking::{TieBreakCascade, TieBreakKey};

/// Points awarded per result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    /// Points for a win (including a walkover win).
    pub win: i32,
    /// Points for a draw.
    pub draw: i32,
    /// Points for a loss.
    pub loss: i32,
    /// Points for losing by walkover. Falls back to `loss` when unset.
    pub walkover_loss: Option<i32>,
}

impl PointsPolicy {
    /// Points charged to the side that did not appear.
    #[must_use]
    pub fn walkover_loss_points(&self) -> i32 {
        self.walkover_loss.unwrap_or(self.loss)
    }
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
            walkover_loss: None,
        }
    }
}

/// Score substituted for matches awarded without play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkoverPolicy {
    /// Goals credited to the side that appeared.
    pub winner_goals: u32,
    /// Goals credited to the side that did not.
    pub loser_goals: u32,
}

impl Default for WalkoverPolicy {
    fn default() -> Self {
        Self {
            winner_goals: 3,
            loser_goals: 0,
        }
    }
}

/// Which period sub-scores count towards goals for/against.
///
/// Sub-scores at index `shootout_from` and beyond are a penalty shootout:
/// they can decide a match but are left out of goal totals. The boundary is
/// stated explicitly per sport and never guessed from how many sub-scores a
/// match happens to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulationRule {
    /// Index of the first non-regulation sub-score, if the sport has one.
    pub shootout_from: Option<usize>,
}

impl RegulationRule {
    /// Every sub-score counts.
    #[must_use]
    pub const fn all_periods() -> Self {
        Self {
            shootout_from: None,
        }
    }

    /// Sub-scores from `index` on are a shootout.
    #[must_use]
    pub const fn shootout_from(index: usize) -> Self {
        Self {
            shootout_from: Some(index),
        }
    }

    /// Whether the sub-score at `index` counts towards goals.
    #[must_use]
    pub fn is_regulation(&self, index: usize) -> bool {
        self.shootout_from.map_or(true, |from| index < from)
    }
}

/// Complete engine configuration for one tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Points system.
    pub points: PointsPolicy,
    /// Walkover score substitution.
    pub walkover: WalkoverPolicy,
    /// Regulation/shootout boundary.
    pub regulation: RegulationRule,
    /// Default tie-break cascade; blocks may override it.
    pub cascade: TieBreakCascade,
    /// Group slots stay unresolved until every expected match of the block
    /// has a confirmed result.
    pub require_settled_blocks: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            points: PointsPolicy::default(),
            walkover: WalkoverPolicy::default(),
            regulation: RegulationRule::default(),
            cascade: TieBreakCascade::default(),
            require_settled_blocks: true,
        }
    }
}

impl EngineConfig {
    /// Checks that the configuration can produce meaningful standings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when a win is worth less than a
    /// draw, a draw less than a loss, or a manual order lists a team twice.
    pub fn validate(&self) -> Result<(), EngineError> {
        let points = &self.points;
        if points.win < points.draw || points.draw < points.loss {
            return Err(EngineError::InvalidConfig(format!(
                "points must satisfy win >= draw >= loss (got {}/{}/{})",
                points.win, points.draw, points.loss
            )));
        }
        validate_cascade(&self.cascade)
    }
}

/// Checks a cascade on its own; used for per-block overrides too.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] when a manual order lists a team
/// more than once.
pub fn validate_cascade(cascade: &TieBreakCascade) -> Result<(), EngineError> {
    for key in cascade.keys() {
        if let TieBreakKey::ManualOrder(order) = key {
            let mut seen = BTreeSet::new();
            if let Some(dup) = order.iter().find(|team| !seen.insert(**team)) {
                return Err(EngineError::InvalidConfig(format!(
                    "manual order lists team {dup} more than once"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::TeamId;

    #[test]
    fn defaults_are_three_one_zero() {
        let config = EngineConfig::default();
        assert_eq!(config.points.win, 3);
        assert_eq!(config.points.draw, 1);
        assert_eq!(config.points.loss, 0);
        assert_eq!(config.points.walkover_loss_points(), 0);
        assert!(config.require_settled_blocks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "regulation": { "shootout_from": 4 } }"#).unwrap();
        assert_eq!(config.regulation, RegulationRule::shootout_from(4));
        assert_eq!(config.points, PointsPolicy::default());
        assert_eq!(config.cascade, TieBreakCascade::default());
    }

    #[test]
    fn regulation_boundary_is_explicit() {
        let rule = RegulationRule::shootout_from(2);
        assert!(rule.is_regulation(0));
        assert!(rule.is_regulation(1));
        assert!(!rule.is_regulation(2));
        assert!(RegulationRule::all_periods().is_regulation(10));
    }

    #[test]
    fn rejects_inverted_points() {
        let mut config = EngineConfig::default();
        config.points.draw = 4;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_duplicate_manual_order() {
        let mut config = EngineConfig::default();
        config.cascade = TieBreakCascade::new(vec![TieBreakKey::ManualOrder(vec![
            TeamId::new(1),
            TeamId::new(1),
        ])]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn walkover_loss_override() {
        let points = PointsPolicy {
            walkover_loss: Some(-1),
            ..PointsPolicy::default()
        };
        assert_eq!(points.walkover_loss_points(), -1);
    }
}
