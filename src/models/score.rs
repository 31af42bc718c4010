//! Round score parsing.

use std::sync::OnceLock;

use regex::Regex;

/// A parsed round score, as written in the record: the first number belongs to
/// `teamName`, the second to the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub team: u32,
    pub opponent: u32,
}

fn score_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d{1,9})\s*-\s*(\d{1,9})\s*$").unwrap())
}

impl Score {
    /// Parse "A-B" or "A - B". Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = score_regex().captures(raw)?;
        let team = caps[1].parse().ok()?;
        let opponent = caps[2].parse().ok()?;
        Some(Self { team, opponent })
    }

    /// Total rounds played.
    pub fn total_rounds(&self) -> u32 {
        self.team + self.opponent
    }

    /// Absolute round difference between the two sides.
    pub fn margin(&self) -> u32 {
        self.team.abs_diff(self.opponent)
    }
}
