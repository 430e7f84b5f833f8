use serde::{Deserialize, Serialize};

/// One ply of a recorded game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEntry {
    /// SAN notation, e.g. "Nf3" or "exd5".
    #[serde(rename = "move")]
    pub san: String,
    /// Position after the move, when the producer supplies it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

impl MoveEntry {
    pub fn new(san: impl Into<String>) -> Self {
        Self {
            san: san.into(),
            fen: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opening {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A recorded game as served by the backend. Immutable once loaded;
/// a new load replaces the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRecord {
    pub moves: Vec<MoveEntry>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub opening: Option<Opening>,
}

impl GameRecord {
    pub fn from_sans<S: Into<String>>(sans: impl IntoIterator<Item = S>) -> Self {
        Self {
            moves: sans.into_iter().map(|s| MoveEntry::new(s)).collect(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Display name for White, falling back like the original UI did.
    pub fn white_name(&self) -> &str {
        self.white.as_deref().unwrap_or("White")
    }

    pub fn black_name(&self) -> &str {
        self.black.as_deref().unwrap_or("Black")
    }
}
