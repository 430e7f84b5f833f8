//! Capture-tray recomputation.
//!
//! The lists are rebuilt in full from the move prefix on every cursor
//! change rather than maintained incrementally. O(ply) per step, but
//! immune to drift between the tray and the live position.

use shakmaty::{san::SanPlus, Chess, Color, Position};

use crate::pieces::piece_glyph;
use crate::record::MoveEntry;

/// Captured-piece glyphs per capturing side, in move order.
/// Pieces White has taken render as black glyphs and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureLists {
    pub white: Vec<char>,
    pub black: Vec<char>,
}

impl CaptureLists {
    pub fn white_line(&self) -> String {
        joined(&self.white)
    }

    pub fn black_line(&self) -> String {
        joined(&self.black)
    }
}

fn joined(glyphs: &[char]) -> String {
    glyphs
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replay `moves[0..ply)` from the start position and collect the captured
/// pieces per side. A move that fails to parse ends the replay early
/// (lenient path: truncate, don't error).
pub fn captured_pieces(moves: &[MoveEntry], ply: usize) -> CaptureLists {
    let mut lists = CaptureLists::default();
    let mut pos = Chess::default();

    for entry in moves.iter().take(ply) {
        let mv = match entry
            .san
            .parse::<SanPlus>()
            .ok()
            .and_then(|san| san.san.to_move(&pos).ok())
        {
            Some(mv) => mv,
            None => break,
        };
        if let Some(role) = mv.capture() {
            match pos.turn() {
                Color::White => lists.white.push(piece_glyph(role, Color::Black)),
                Color::Black => lists.black.push(piece_glyph(role, Color::White)),
            }
        }
        pos.play_unchecked(mv);
    }

    lists
}
