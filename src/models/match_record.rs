//! Historical match records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a match from the perspective of `team_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    /// Any other label (e.g. "draw"). Counts neither as a win nor as a loss.
    Other(String),
}

impl MatchResult {
    pub fn as_str(&self) -> &str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
            MatchResult::Other(label) => label.as_str(),
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, MatchResult::Win)
    }

    pub fn is_loss(&self) -> bool {
        matches!(self, MatchResult::Loss)
    }
}

impl From<&str> for MatchResult {
    fn from(s: &str) -> Self {
        match s {
            "win" => MatchResult::Win,
            "loss" => MatchResult::Loss,
            other => MatchResult::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for MatchResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single historical match result.
///
/// Decoding never fails on field contents: history sources are not trusted to
/// be well-formed, and bad values are dealt with by each metric on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMatchRecord")]
pub struct MatchRecord {
    #[serde(rename = "teamName")]
    pub team_name: String,

    pub opponent: String,

    pub result: MatchResult,

    /// Free-form score text, e.g. "13-5" or "13 - 5". `None` when absent or
    /// not a string; a non-string value is kept in `extra` under `"score"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,

    /// Unknown fields, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchRecord {
    pub fn new(team_name: &str, result: MatchResult, score: &str, opponent: &str) -> Self {
        Self {
            team_name: team_name.to_string(),
            opponent: opponent.to_string(),
            result,
            score: Some(score.to_string()),
            extra: Map::new(),
        }
    }

    /// Text used for similarity retrieval: `"{teamName} {result} {opponent}"`.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.team_name, self.result, self.opponent)
    }
}

/// Wire shape of a match record before normalization.
#[derive(Debug, Deserialize)]
struct RawMatchRecord {
    #[serde(default, rename = "teamName")]
    team_name: Value,

    #[serde(default)]
    opponent: Value,

    #[serde(default)]
    result: Value,

    #[serde(default)]
    score: Value,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawMatchRecord> for MatchRecord {
    fn from(raw: RawMatchRecord) -> Self {
        let mut extra = raw.extra;
        let score = match raw.score {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => {
                extra.insert("score".to_string(), other);
                None
            }
        };

        Self {
            team_name: lenient_text(raw.team_name),
            opponent: lenient_text(raw.opponent),
            result: MatchResult::from(lenient_text(raw.result).as_str()),
            score,
            extra,
        }
    }
}

fn lenient_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
