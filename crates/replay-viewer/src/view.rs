//! Rendering surface for the replay controller.
//!
//! The browser original drove a board widget plus a handful of DOM nodes;
//! [`ReplayView`] is that surface with the DOM abstracted away. The
//! controller pushes full values on every change and implementations just
//! display them.

use replay_core::captures::CaptureLists;

use crate::eval_tracker::AccuracySummary;

pub trait ReplayView: Send {
    /// Redraw the board at the given position.
    fn set_board(&mut self, fen: &str);

    /// Replace the status line ("Move 3/40" etc).
    fn set_status(&mut self, text: &str);

    /// Append to the status line (evaluation suffix, error suffix).
    fn append_status(&mut self, text: &str);

    fn set_players(&mut self, white: &str, black: &str);

    fn set_opening(&mut self, name: &str, url: Option<&str>);

    fn set_turn_indicator(&mut self, text: &str);

    fn set_captures(&mut self, captures: &CaptureLists);

    /// Eval-bar fill in percent (0 = Black winning, 100 = White winning).
    fn set_eval_bar(&mut self, percent: f64);

    fn set_accuracy(&mut self, summary: &AccuracySummary);
}

/// Terminal view: prints each update as it arrives.
#[derive(Debug, Default)]
pub struct TextView;

impl ReplayView for TextView {
    fn set_board(&mut self, fen: &str) {
        println!("[board]    {fen}");
    }

    fn set_status(&mut self, text: &str) {
        println!("[status]   {text}");
    }

    fn append_status(&mut self, text: &str) {
        println!("[status+]  {text}");
    }

    fn set_players(&mut self, white: &str, black: &str) {
        println!("[players]  {white} vs {black}");
    }

    fn set_opening(&mut self, name: &str, url: Option<&str>) {
        match url {
            Some(url) => println!("[opening]  {name} ({url})"),
            None => println!("[opening]  {name}"),
        }
    }

    fn set_turn_indicator(&mut self, text: &str) {
        println!("[turn]     {text}");
    }

    fn set_captures(&mut self, captures: &CaptureLists) {
        println!(
            "[captures] white: {} | black: {}",
            captures.white_line(),
            captures.black_line()
        );
    }

    fn set_eval_bar(&mut self, percent: f64) {
        println!("[eval bar] {percent:.0}%");
    }

    fn set_accuracy(&mut self, summary: &AccuracySummary) {
        println!(
            "[accuracy] white {} ({} blunders, {} inaccuracies) | black {} ({} blunders, {} inaccuracies)",
            AccuracySummary::format_accuracy(summary.white_accuracy),
            summary.blunders.white,
            summary.inaccuracies.white,
            AccuracySummary::format_accuracy(summary.black_accuracy),
            summary.blunders.black,
            summary.inaccuracies.black,
        );
    }
}

/// Headless view that keeps the latest value of every surface. Used by
/// tests and anywhere the display is rendered elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryView {
    pub board_fen: String,
    pub status: String,
    pub white: String,
    pub black: String,
    pub opening: Option<(String, Option<String>)>,
    pub turn_indicator: String,
    pub captures: CaptureLists,
    pub eval_bar_percent: Option<f64>,
    pub accuracy: Option<AccuracySummary>,
}

impl ReplayView for MemoryView {
    fn set_board(&mut self, fen: &str) {
        self.board_fen = fen.to_string();
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn append_status(&mut self, text: &str) {
        self.status.push_str(text);
    }

    fn set_players(&mut self, white: &str, black: &str) {
        self.white = white.to_string();
        self.black = black.to_string();
    }

    fn set_opening(&mut self, name: &str, url: Option<&str>) {
        self.opening = Some((name.to_string(), url.map(str::to_string)));
    }

    fn set_turn_indicator(&mut self, text: &str) {
        self.turn_indicator = text.to_string();
    }

    fn set_captures(&mut self, captures: &CaptureLists) {
        self.captures = captures.clone();
    }

    fn set_eval_bar(&mut self, percent: f64) {
        self.eval_bar_percent = Some(percent);
    }

    fn set_accuracy(&mut self, summary: &AccuracySummary) {
        self.accuracy = Some(*summary);
    }
}
