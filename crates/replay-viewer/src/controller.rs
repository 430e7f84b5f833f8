//! Replay state controller: move cursor, derived capture lists, and
//! evaluation bookkeeping for stepping through a recorded game.

use shakmaty::{fen::Fen, san::SanPlus, Chess, Color, EnPassantMode, Position};
use tracing::debug;

use replay_core::captures;
use replay_core::record::GameRecord;

use crate::clients::Evaluation;
use crate::error::ViewerError;
use crate::eval_tracker::EvalTracker;
use crate::score::NEUTRAL_BAR_PERCENT;
use crate::view::ReplayView;

/// Generation token for an in-flight evaluation request.
///
/// Evaluation fetches are fire-and-forget, so a slow response for an old
/// position can arrive after the user has stepped on. The token records
/// the cursor at issue time; [`ReplayController::apply_evaluation`] drops
/// any response whose token no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRequest {
    pub ply: usize,
    pub fen: String,
}

/// Owns everything the viewer displays for one loaded game.
///
/// Invariant: `history[ply]` is always the start position with
/// `record.moves[0..ply)` applied, and `history` holds exactly `ply + 1`
/// entries (so a single-ply undo is a pop).
pub struct ReplayController<V: ReplayView> {
    record: GameRecord,
    ply: usize,
    history: Vec<Chess>,
    tracker: EvalTracker,
    view: V,
}

impl<V: ReplayView> ReplayController<V> {
    pub fn new(view: V) -> Self {
        Self {
            record: GameRecord::default(),
            ply: 0,
            history: vec![Chess::default()],
            tracker: EvalTracker::default(),
            view,
        }
    }

    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn tracker(&self) -> &EvalTracker {
        &self.tracker
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn position(&self) -> &Chess {
        &self.history[self.ply]
    }

    /// FEN of the live position.
    pub fn fen(&self) -> String {
        Fen::from_position(self.position(), EnPassantMode::Legal).to_string()
    }

    /// Replace the loaded game and reset every piece of derived state:
    /// cursor to 0, capture lists empty, counters and accuracy zeroed,
    /// previous evaluation cleared, board back at the start position.
    pub fn install_record(&mut self, record: GameRecord) -> EvalRequest {
        self.record = record;
        self.ply = 0;
        self.history.clear();
        self.history.push(Chess::default());
        self.tracker.reset();

        self.view.set_board(&self.fen());
        self.view
            .set_players(self.record.white_name(), self.record.black_name());
        if let Some(opening) = self.record.opening.clone() {
            if !opening.name.is_empty() {
                self.view.set_opening(&opening.name, opening.url.as_deref());
            }
        }
        self.refresh()
    }

    /// Apply the next recorded move. No-op at the end of the game.
    /// The recorded SAN must be legal in the live position; a move the
    /// rules engine rejects is an error, not a silent skip.
    pub fn next_move(&mut self) -> Result<Option<EvalRequest>, ViewerError> {
        if self.ply >= self.record.moves.len() {
            return Ok(None);
        }
        let san_str = self.record.moves[self.ply].san.clone();
        let mv = san_str
            .parse::<SanPlus>()
            .ok()
            .and_then(|san| san.san.to_move(self.position()).ok())
            .ok_or_else(|| ViewerError::IllegalMove {
                ply: self.ply,
                san: san_str,
            })?;

        let mut next = self.position().clone();
        next.play_unchecked(mv);
        self.history.push(next);
        self.ply += 1;

        self.view.set_board(&self.fen());
        Ok(Some(self.refresh()))
    }

    /// Undo one ply. No-op at the start of the game.
    pub fn prev_move(&mut self) -> Option<EvalRequest> {
        if self.ply == 0 {
            return None;
        }
        self.history.pop();
        self.ply -= 1;

        self.view.set_board(&self.fen());
        Some(self.refresh())
    }

    /// Recompute and display the move counter, turn indicator, and capture
    /// lists, then hand back a token for the evaluation fetch. The
    /// controller never waits on evaluation itself.
    pub fn refresh(&mut self) -> EvalRequest {
        self.view
            .set_status(&format!("Move {}/{}", self.ply, self.record.moves.len()));
        self.view.set_turn_indicator(match self.position().turn() {
            Color::White => "White to move",
            Color::Black => "Black to move",
        });
        self.view
            .set_captures(&captures::captured_pieces(&self.record.moves, self.ply));

        EvalRequest {
            ply: self.ply,
            fen: self.fen(),
        }
    }

    /// Apply the outcome of an evaluation request issued by [`refresh`].
    ///
    /// A response for a position the user has since navigated away from is
    /// discarded without touching any state. The FEN check also covers a
    /// new game being loaded while the request was in flight: matching the
    /// ply alone would accept a score for a different position. A service
    /// error only adds a status suffix and neutralizes the eval bar; the
    /// tracker is left untouched so a transient failure never poisons the
    /// statistics.
    pub fn apply_evaluation(
        &mut self,
        request: &EvalRequest,
        outcome: Result<Evaluation, ViewerError>,
    ) {
        if request.ply != self.ply || request.fen != self.fen() {
            debug!(
                issued = request.ply,
                current = self.ply,
                "discarding stale evaluation response"
            );
            return;
        }

        match outcome {
            Ok(eval) => {
                let best = eval.best_move.as_deref().unwrap_or("-");
                self.view
                    .append_status(&format!(" | Eval: {} | Best move: {best}", eval.score));
                self.view.set_eval_bar(eval.score.bar_percent());

                // The ply that led here was played by the side not now on move.
                let mover = !self.position().turn();
                self.tracker.record(eval.score, mover);
                self.view.set_accuracy(&self.tracker.summary());
            }
            Err(err) => {
                debug!(error = %err, ply = self.ply, "evaluation unavailable");
                self.view.append_status(" | Evaluation unavailable.");
                self.view.set_eval_bar(NEUTRAL_BAR_PERCENT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;
    use crate::view::MemoryView;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn controller_with(sans: &[&str]) -> ReplayController<MemoryView> {
        let mut controller = ReplayController::new(MemoryView::default());
        controller.install_record(GameRecord::from_sans(sans.iter().copied()));
        controller
    }

    fn ok_eval(score: Score) -> Result<Evaluation, ViewerError> {
        Ok(Evaluation {
            score,
            best_move: Some("e2e4".to_string()),
        })
    }

    #[test]
    fn test_install_resets_to_start() {
        let controller = controller_with(&["e4", "e5"]);
        assert_eq!(controller.ply(), 0);
        assert_eq!(controller.fen(), START_FEN);
        assert_eq!(controller.view().status, "Move 0/2");
        assert_eq!(controller.view().turn_indicator, "White to move");
    }

    #[test]
    fn test_next_then_prev_round_trips() {
        let mut controller = controller_with(&["e4", "e5", "Nf3", "Nc6"]);

        controller.next_move().unwrap();
        controller.next_move().unwrap();
        let fen_after_two = controller.fen();

        controller.next_move().unwrap();
        assert_eq!(controller.ply(), 3);
        controller.prev_move();

        assert_eq!(controller.ply(), 2);
        assert_eq!(controller.fen(), fen_after_two);
        assert_eq!(controller.view().board_fen, fen_after_two);
    }

    #[test]
    fn test_prev_to_start_restores_initial_position() {
        let mut controller = controller_with(&["d4", "d5"]);
        controller.next_move().unwrap();
        controller.next_move().unwrap();
        controller.prev_move();
        controller.prev_move();
        assert_eq!(controller.ply(), 0);
        assert_eq!(controller.fen(), START_FEN);
    }

    #[test]
    fn test_steps_are_no_ops_at_bounds() {
        let mut controller = controller_with(&["e4"]);

        assert!(controller.prev_move().is_none());
        assert_eq!(controller.ply(), 0);

        controller.next_move().unwrap();
        assert!(controller.next_move().unwrap().is_none());
        assert_eq!(controller.ply(), 1);
    }

    #[test]
    fn test_capture_tray_follows_cursor() {
        let mut controller = controller_with(&["e4", "d5", "exd5", "Qxd5"]);
        for _ in 0..4 {
            controller.next_move().unwrap();
        }
        assert_eq!(controller.view().captures.white, vec!['♟']);
        assert_eq!(controller.view().captures.black, vec!['♙']);

        controller.prev_move();
        assert_eq!(controller.view().captures.white, vec!['♟']);
        assert!(controller.view().captures.black.is_empty());
    }

    #[test]
    fn test_illegal_recorded_move_is_an_error() {
        let mut controller = controller_with(&["e4", "Qh7"]);
        controller.next_move().unwrap();
        let err = controller.next_move().unwrap_err();
        assert!(matches!(err, ViewerError::IllegalMove { ply: 1, .. }));
        // Cursor did not advance past the bad ply.
        assert_eq!(controller.ply(), 1);
    }

    #[test]
    fn test_stale_evaluation_is_discarded() {
        let mut controller = controller_with(&["e4", "e5"]);
        let stale = controller.next_move().unwrap().unwrap();
        controller.next_move().unwrap();

        let before = controller.tracker().summary();
        let bar_before = controller.view().eval_bar_percent;
        controller.apply_evaluation(&stale, ok_eval(Score::Pawns(7.0)));

        assert_eq!(controller.tracker().summary(), before);
        assert_eq!(controller.tracker().prev_eval(), None);
        assert_eq!(controller.view().eval_bar_percent, bar_before);
    }

    #[test]
    fn test_response_from_previous_game_is_discarded() {
        // A response still in flight when a new game is installed must not
        // be applied, even once the new game reaches the same ply.
        let mut controller = controller_with(&["e4", "e5"]);
        controller.next_move().unwrap();
        let from_old_game = controller.next_move().unwrap().unwrap();

        controller.install_record(GameRecord::from_sans(["d4", "d5"]));
        controller.next_move().unwrap();
        controller.next_move().unwrap();
        assert_eq!(controller.ply(), from_old_game.ply);

        controller.apply_evaluation(&from_old_game, ok_eval(Score::Pawns(9.0)));

        assert_eq!(controller.tracker().prev_eval(), None);
        let summary = controller.tracker().summary();
        assert_eq!(summary.blunders, crate::eval_tracker::SideCounts::default());
        assert_eq!(controller.view().eval_bar_percent, None);
    }

    #[test]
    fn test_evaluation_flow_attributes_mover() {
        let mut controller = controller_with(&["e4", "e5"]);
        let at_start = controller.refresh();
        controller.apply_evaluation(&at_start, ok_eval(Score::Pawns(0.0)));

        // White plays; swing of 3.5 lands on White.
        let after_e4 = controller.next_move().unwrap().unwrap();
        controller.apply_evaluation(&after_e4, ok_eval(Score::Pawns(3.5)));

        let summary = controller.tracker().summary();
        assert_eq!(summary.blunders.white, 1);
        assert_eq!(summary.blunders.black, 0);
        assert_eq!(controller.view().eval_bar_percent, Some(67.5));
        assert!(controller.view().status.contains("Eval: 3.5"));
        assert!(controller.view().status.contains("Best move: e2e4"));
    }

    #[test]
    fn test_evaluation_error_leaves_tracker_untouched() {
        let mut controller = controller_with(&["e4"]);
        let at_start = controller.refresh();
        controller.apply_evaluation(&at_start, ok_eval(Score::Pawns(0.2)));

        let before = controller.tracker().summary();
        let request = controller.next_move().unwrap().unwrap();
        controller.apply_evaluation(
            &request,
            Err(ViewerError::Evaluation("engine timed out".to_string())),
        );

        assert_eq!(controller.tracker().summary(), before);
        assert_eq!(controller.tracker().prev_eval(), Some(0.2));
        assert_eq!(controller.view().eval_bar_percent, Some(50.0));
        assert!(controller.view().status.ends_with("Evaluation unavailable."));
    }

    #[test]
    fn test_mate_score_pins_eval_bar() {
        let mut controller = controller_with(&["e4"]);
        let request = controller.refresh();
        controller.apply_evaluation(&request, ok_eval(Score::Mate(-2)));
        assert_eq!(controller.view().eval_bar_percent, Some(0.0));

        let request = controller.refresh();
        controller.apply_evaluation(&request, ok_eval(Score::Mate(1)));
        assert_eq!(controller.view().eval_bar_percent, Some(100.0));
    }

    #[test]
    fn test_new_load_resets_everything() {
        let mut controller = controller_with(&["e4", "d5", "exd5"]);
        for _ in 0..3 {
            let request = controller.next_move().unwrap().unwrap();
            controller.apply_evaluation(&request, ok_eval(Score::Pawns(2.5)));
        }
        assert!(controller.tracker().prev_eval().is_some());
        assert!(!controller.view().captures.white.is_empty());

        controller.install_record(GameRecord::from_sans(["c4"]));

        assert_eq!(controller.ply(), 0);
        assert_eq!(controller.fen(), START_FEN);
        assert!(controller.view().captures.white.is_empty());
        assert!(controller.view().captures.black.is_empty());
        assert_eq!(controller.tracker().prev_eval(), None);
        let summary = controller.tracker().summary();
        assert_eq!(summary.blunders.white + summary.blunders.black, 0);
        assert_eq!(summary.white_accuracy, None);
        assert_eq!(summary.black_accuracy, None);
    }

    #[test]
    fn test_player_names_fall_back() {
        let mut controller = ReplayController::new(MemoryView::default());
        controller.install_record(GameRecord {
            white: Some("alice".to_string()),
            ..GameRecord::from_sans(["e4"])
        });
        assert_eq!(controller.view().white, "alice");
        assert_eq!(controller.view().black, "Black");
    }
}
