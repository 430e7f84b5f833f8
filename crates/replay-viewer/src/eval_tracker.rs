//! Accuracy and blunder bookkeeping over consecutive evaluations.
//!
//! Move quality is judged by the evaluation swing between the positions
//! before and after a ply, attributed to the side that played it. Only
//! evaluations accepted for the current position ever reach this tracker.

use shakmaty::Color;

use crate::score::Score;

/// Swing above which a move counts as a blunder (pawn units).
const BLUNDER_THRESHOLD: f64 = 2.0;
/// Swing above which (up to the blunder threshold) a move counts as an inaccuracy.
const INACCURACY_THRESHOLD: f64 = 1.0;
/// A 5-pawn swing maps to an accuracy sample of zero.
const ACCURACY_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideCounts {
    pub white: u32,
    pub black: u32,
}

impl SideCounts {
    pub fn get(&self, side: Color) -> u32 {
        match side {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn bump(&mut self, side: Color) {
        match side {
            Color::White => self.white += 1,
            Color::Black => self.black += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SideSamples {
    white: Vec<f64>,
    black: Vec<f64>,
}

impl SideSamples {
    fn push(&mut self, side: Color, sample: f64) {
        match side {
            Color::White => self.white.push(sample),
            Color::Black => self.black.push(sample),
        }
    }

    fn average_percent(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            None
        } else {
            Some(samples.iter().sum::<f64>() / samples.len() as f64 * 100.0)
        }
    }
}

/// Displayed aggregates: counters verbatim, accuracy as a percentage
/// (`None` until a side has at least one sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracySummary {
    pub blunders: SideCounts,
    pub inaccuracies: SideCounts,
    pub white_accuracy: Option<f64>,
    pub black_accuracy: Option<f64>,
}

impl AccuracySummary {
    /// One-decimal percentage, or the placeholder when no samples exist yet.
    pub fn format_accuracy(accuracy: Option<f64>) -> String {
        match accuracy {
            Some(percent) => format!("{percent:.1}"),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvalTracker {
    prev_eval: Option<f64>,
    blunders: SideCounts,
    inaccuracies: SideCounts,
    accuracy: SideSamples,
}

impl EvalTracker {
    /// Record an accepted evaluation for the current position. `mover` is
    /// the side that played the ply leading to it.
    ///
    /// Classification only happens when both this score and the previous
    /// one are numeric; mate scores neither classify nor replace
    /// `prev_eval`. The accuracy sample is appended unconditionally once a
    /// diff exists — only the counters are thresholded.
    pub fn record(&mut self, score: Score, mover: Color) {
        if let (Some(prev), Some(current)) = (self.prev_eval, score.pawns()) {
            let diff = (current - prev).abs();
            if diff > BLUNDER_THRESHOLD {
                self.blunders.bump(mover);
            } else if diff > INACCURACY_THRESHOLD {
                self.inaccuracies.bump(mover);
            }
            self.accuracy
                .push(mover, (1.0 - diff / ACCURACY_SCALE).max(0.0));
        }
        if let Some(current) = score.pawns() {
            self.prev_eval = Some(current);
        }
    }

    /// Zero everything; called on a new game load.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn prev_eval(&self) -> Option<f64> {
        self.prev_eval
    }

    pub fn summary(&self) -> AccuracySummary {
        AccuracySummary {
            blunders: self.blunders,
            inaccuracies: self.inaccuracies,
            white_accuracy: SideSamples::average_percent(&self.accuracy.white),
            black_accuracy: SideSamples::average_percent(&self.accuracy.black),
        }
    }
}
