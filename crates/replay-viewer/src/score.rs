//! Evaluation score model and eval-bar mapping.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Eval-bar fill for an unknown or balanced position.
pub const NEUTRAL_BAR_PERCENT: f64 = 50.0;

/// A position evaluation as reported by the analysis service.
///
/// The wire form is either a JSON number (pawn units, positive favoring
/// White) or a string like `"mate 3"` / `"mate -2"`, where the sign
/// indicates which side is on the losing end of the mate line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Pawns(f64),
    Mate(i32),
}

impl Score {
    /// Parse the textual mate form, e.g. "mate 3" or "mate -2".
    pub fn parse_mate(s: &str) -> Option<Score> {
        let rest = s.strip_prefix("mate")?.trim();
        rest.parse::<i32>().ok().map(Score::Mate)
    }

    /// Numeric value in pawns, if this is not a mate score.
    pub fn pawns(&self) -> Option<f64> {
        match self {
            Score::Pawns(v) => Some(*v),
            Score::Mate(_) => None,
        }
    }

    /// Height of the eval bar in percent: 50 is equal, 100 winning for
    /// White. Numeric scores saturate at ±10 pawns; mate scores pin the
    /// bar to whichever end the sign points at.
    pub fn bar_percent(&self) -> f64 {
        match self {
            Score::Pawns(v) => (50.0 + v * 5.0).clamp(0.0, 100.0),
            Score::Mate(n) => {
                if *n < 0 {
                    0.0
                } else {
                    100.0
                }
            }
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Pawns(v) => write!(f, "{v}"),
            Score::Mate(n) => write!(f, "mate {n}"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Pawns(v) => serializer.serialize_f64(*v),
            Score::Mate(n) => serializer.serialize_str(&format!("mate {n}")),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Score::Pawns)
                .ok_or_else(|| de::Error::custom("score out of f64 range")),
            serde_json::Value::String(s) => Score::parse_mate(&s)
                .ok_or_else(|| de::Error::custom(format!("unrecognized score string: {s}"))),
            other => Err(de::Error::custom(format!(
                "score must be a number or mate string, got {other}"
            ))),
        }
    }
}
