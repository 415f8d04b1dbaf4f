//! Placeholder label grammar.
//!
//! Later-round matches are created before their participants are known and
//! carry labels such as `"A1位"` or `"M12_winner"` in their team slots. This
//! module is the single place that reads those labels; the resolver only ever
//! sees a [`SlotReference`].
//!
//! Recognized forms, after trimming and folding full-width ASCII:
//!
//! | Label | Reference |
//! |-------|-----------|
//! | `A1位`, `A組1位`, `Aブロック1位` | block `A`, place 1 |
//! | `A_1`, `A-1` | block `A`, place 1 |
//! | `M12_winner`, `M12勝者` | winner of `M12` |
//! | `M12_loser`, `M12敗者` | loser of `M12` |
//!
//! Block names are upper-cased (`a1位` reads as block `A`), so blocks should
//! be declared with upper-case ids. Match codes are kept as written.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::team::{BlockId, MatchCode};

static BLOCK_PLACE_JA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<letter>[A-Za-z]+)|(?P<named>[A-Za-z0-9]+)(?:組|ブロック))",
        r"(?P<place>[0-9]+)位$",
    ))
    .expect("block place pattern compiles")
});

static BLOCK_PLACE_ASCII: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<block>[A-Za-z]+)[_-](?P<place>[0-9]+)$")
        .expect("block place pattern compiles")
});

static MATCH_OUTCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<code>[A-Za-z0-9]+)(?:_(?i:(?P<en>winner|loser))|(?P<ja>勝者|敗者))$")
        .expect("match outcome pattern compiles")
});

/// Which team of a bracket match a slot takes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The winner.
    Winner,
    /// The loser (third-place matches).
    Loser,
}

/// A structured placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotReference {
    /// The team finishing at `position` in `block`.
    BlockPosition {
        /// Source block.
        block: BlockId,
        /// Requested place, 1-based.
        position: u32,
    },
    /// The winner of a bracket match.
    MatchWinner {
        /// Source match.
        code: MatchCode,
    },
    /// The loser of a bracket match.
    MatchLoser {
        /// Source match.
        code: MatchCode,
    },
}

impl SlotReference {
    /// Whether this reference reads from `block`.
    #[must_use]
    pub fn reads_block(&self, block: &BlockId) -> bool {
        matches!(self, Self::BlockPosition { block: b, .. } if b == block)
    }

    /// Whether this reference reads from match `code`.
    #[must_use]
    pub fn reads_match(&self, code: &MatchCode) -> bool {
        matches!(self, Self::MatchWinner { code: c } | Self::MatchLoser { code: c } if c == code)
    }

    /// Source match and outcome, for bracket references.
    #[must_use]
    pub fn bracket_source(&self) -> Option<(&MatchCode, MatchOutcome)> {
        match self {
            Self::BlockPosition { .. } => None,
            Self::MatchWinner { code } => Some((code, MatchOutcome::Winner)),
            Self::MatchLoser { code } => Some((code, MatchOutcome::Loser)),
        }
    }
}

impl fmt::Display for SlotReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockPosition { block, position } => write!(f, "block {block} place {position}"),
            Self::MatchWinner { code } => write!(f, "winner of {code}"),
            Self::MatchLoser { code } => write!(f, "loser of {code}"),
        }
    }
}

/// Parses a slot label.
///
/// Returns `None` for anything outside the grammar: the label is then a real
/// team name or free text and must be left alone.
///
/// # Example
///
/// ```
/// use standings_core::advancement::{match_slot_pattern, SlotReference};
/// use standings_core::team::{BlockId, MatchCode};
///
/// assert_eq!(
///     match_slot_pattern("A組2位"),
///     Some(SlotReference::BlockPosition { block: BlockId::new("A"), position: 2 }),
/// );
/// assert_eq!(
///     match_slot_pattern("M12_winner"),
///     Some(SlotReference::MatchWinner { code: MatchCode::new("M12") }),
/// );
/// assert_eq!(match_slot_pattern("Kita FC"), None);
/// ```
#[must_use]
pub fn match_slot_pattern(label: &str) -> Option<SlotReference> {
    let label = fold_width(label.trim());

    if let Some(caps) = BLOCK_PLACE_JA.captures(&label) {
        let block = caps.name("letter").or_else(|| caps.name("named"))?;
        return block_position(block.as_str(), &caps["place"]);
    }
    if let Some(caps) = BLOCK_PLACE_ASCII.captures(&label) {
        return block_position(&caps["block"], &caps["place"]);
    }
    if let Some(caps) = MATCH_OUTCOME.captures(&label) {
        let code = MatchCode::new(&caps["code"]);
        let is_winner = match (caps.name("en"), caps.name("ja")) {
            (Some(en), _) => en.as_str().eq_ignore_ascii_case("winner"),
            (None, Some(ja)) => ja.as_str() == "勝者",
            (None, None) => return None,
        };
        return Some(if is_winner {
            SlotReference::MatchWinner { code }
        } else {
            SlotReference::MatchLoser { code }
        });
    }
    None
}

fn block_position(block: &str, place: &str) -> Option<SlotReference> {
    let position: u32 = place.parse().ok()?;
    if position == 0 {
        return None;
    }
    Some(SlotReference::BlockPosition {
        block: BlockId::new(&block.to_ascii_uppercase()),
        position,
    })
}

/// Folds full-width ASCII variants (`Ａ１`) to their half-width forms.
fn fold_width(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(u32::from(c) - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(block: &str, position: u32) -> Option<SlotReference> {
        Some(SlotReference::BlockPosition {
            block: BlockId::new(block),
            position,
        })
    }

    fn winner(code: &str) -> Option<SlotReference> {
        Some(SlotReference::MatchWinner {
            code: MatchCode::new(code),
        })
    }

    #[test]
    fn block_place_forms() {
        assert_eq!(match_slot_pattern("A1位"), place("A", 1));
        assert_eq!(match_slot_pattern("A組1位"), place("A", 1));
        assert_eq!(match_slot_pattern("Bブロック3位"), place("B", 3));
        assert_eq!(match_slot_pattern("2組1位"), place("2", 1));
        assert_eq!(match_slot_pattern("A12位"), place("A", 12));
        assert_eq!(match_slot_pattern("A_1"), place("A", 1));
        assert_eq!(match_slot_pattern("C-2"), place("C", 2));
    }

    #[test]
    fn block_names_are_upper_cased() {
        assert_eq!(match_slot_pattern("a1位"), place("A", 1));
        assert_eq!(match_slot_pattern("b組2位"), place("B", 2));
        assert_eq!(match_slot_pattern("c_3"), place("C", 3));
        assert_eq!(match_slot_pattern("ａ１位"), place("A", 1));
    }

    #[test]
    fn full_width_and_padding() {
        assert_eq!(match_slot_pattern(" Ａ１位 "), place("A", 1));
        assert_eq!(match_slot_pattern("Ｍ３_winner"), winner("M3"));
    }

    #[test]
    fn match_outcome_forms() {
        assert_eq!(match_slot_pattern("M12_winner"), winner("M12"));
        assert_eq!(match_slot_pattern("M12_Winner"), winner("M12"));
        assert_eq!(match_slot_pattern("M12勝者"), winner("M12"));
        assert_eq!(
            match_slot_pattern("SF2_loser"),
            Some(SlotReference::MatchLoser {
                code: MatchCode::new("SF2"),
            })
        );
        assert_eq!(
            match_slot_pattern("SF2敗者"),
            Some(SlotReference::MatchLoser {
                code: MatchCode::new("SF2"),
            })
        );
    }

    #[test]
    fn literals_are_not_placeholders() {
        for label in ["Kita FC", "", "A0位", "A_0", "M12_champion", "1位", "A位", "TBD"] {
            assert_eq!(match_slot_pattern(label), None, "{label:?}");
        }
    }

    #[test]
    fn reference_targets() {
        let reference = place("A", 1).unwrap();
        assert!(reference.reads_block(&BlockId::new("A")));
        assert!(!reference.reads_block(&BlockId::new("B")));
        assert!(!reference.reads_match(&MatchCode::new("A")));
        assert!(winner("M1").unwrap().reads_match(&MatchCode::new("M1")));
        assert_eq!(
            winner("M1").unwrap().bracket_source(),
            Some((&MatchCode::new("M1"), MatchOutcome::Winner))
        );
        assert_eq!(reference.bracket_source(), None);
    }

    #[test]
    fn display_reads_naturally() {
        assert_eq!(place("A", 2).unwrap().to_string(), "block A place 2");
        assert_eq!(winner("M4").unwrap().to_string(), "winner of M4");
    }
}
