//! PGN parsing — lightweight regex-based parser producing a [`GameRecord`]
//! with a post-move FEN attached to every ply.

use regex::Regex;
use shakmaty::{fen::Fen, san::SanPlus, Chess, EnPassantMode, Position};

use crate::record::{GameRecord, MoveEntry, Opening};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a PGN string into a replayable record.
/// Returns `None` for games without moves or with a non-standard start.
pub fn parse_pgn(pgn: &str) -> Option<GameRecord> {
    let header_re = Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).ok()?;

    let mut white = None;
    let mut black = None;
    let mut eco = None;
    let mut eco_url = None;
    let mut opening_name = None;
    let mut setup = None;
    let mut fen = None;

    for cap in header_re.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => white = Some(value),
            "Black" => black = Some(value),
            "ECO" => eco = Some(value),
            "ECOUrl" => eco_url = Some(value),
            "Opening" => opening_name = Some(value),
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // Reject games that don't start from the standard position
    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STANDARD_START_FEN {
                return None;
            }
        }
    }

    let sans = extract_moves(pgn);
    if sans.is_empty() {
        return None;
    }

    // ECO code takes precedence, with the Opening header as fallback,
    // matching what the original /load_game endpoint served.
    let opening = eco
        .filter(|name| !name.is_empty())
        .or(opening_name.filter(|name| !name.is_empty()))
        .map(|name| Opening {
            name,
            url: eco_url.filter(|u| !u.is_empty()),
        });

    Some(GameRecord {
        moves: replay_sans(&sans),
        white,
        black,
        opening,
    })
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    let header_re = Regex::new(r"\[[^\]]*\]").unwrap();
    let no_headers = header_re.replace_all(pgn, "");

    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    let no_comments = comment_re.replace_all(&no_headers, "");

    let variation_re = Regex::new(r"\([^)]*\)").unwrap();
    let no_variations = variation_re.replace_all(&no_comments, "");

    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap();

    move_re
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Replay the SAN sequence from the start position, attaching the position
/// after each ply. An unparseable or illegal move truncates the record there.
fn replay_sans(sans: &[String]) -> Vec<MoveEntry> {
    let mut pos = Chess::default();
    let mut entries = Vec::with_capacity(sans.len());

    for san_str in sans {
        let mv = match san_str
            .parse::<SanPlus>()
            .ok()
            .and_then(|san| san.san.to_move(&pos).ok())
        {
            Some(mv) => mv,
            None => break,
        };
        pos.play_unchecked(mv);
        entries.push(MoveEntry {
            san: san_str.clone(),
            fen: Some(Fen::from_position(&pos, EnPassantMode::Legal).to_string()),
        });
    }

    entries
}
