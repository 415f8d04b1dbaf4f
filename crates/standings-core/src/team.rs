//! Identifier types shared by every stage of the engine.
//!
//! - [`TeamId`]: numeric team identifier, ordered by value
//! - [`BlockId`]: name of a block/group (`"A"`, `"1"`)
//! - [`MatchCode`]: code of a match (`"M12"`), used by bracket slots
//! - [`Team`]: an identifier paired with its display name
//!
//! # Example
//!
//! ```
//! use standings_core::team::{BlockId, MatchCode, Team, TeamId};
//!
//! let team = Team::new(TeamId::new(7), "Kita FC");
//! assert_eq!(team.id.as_u64(), 7);
//! assert_eq!(BlockId::new("A").as_str(), "A");
//! assert_eq!(MatchCode::new("M12").to_string(), "M12");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a team.
///
/// Team IDs are ordered by their numeric value. Maps keyed by `TeamId` are
/// `BTreeMap`s throughout the engine so iteration order never depends on
/// hashing.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(u64);

impl TeamId {
    /// Creates a new `TeamId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TeamId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<TeamId> for u64 {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

/// Name of a block (group) within a tournament.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Creates a new `BlockId`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the block name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Code identifying a single match (`"M12"`).
///
/// Bracket placeholders such as `"M12_winner"` refer to their source match
/// by this code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchCode(String);

impl MatchCode {
    /// Creates a new `MatchCode`.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MatchCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MatchCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A team identity together with the name shown on standings and brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
}

impl Team {
    /// Creates a new team.
    #[must_use]
    pub fn new(id: TeamId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Which side of a match a team or slot is on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// First-listed team.
    Home,
    /// Second-listed team.
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Away => write!(f, "away"),
        }
    }
}
