//! Relevance scoring for retained items.
//!
//! ```text
//! score = C × log2(1 + U) × e^(-λ·t)
//! ```
//!
//! `C` is confidence, `U` usage, `λ` the decay rate and `t` the logical time
//! elapsed since the item was last touched. An item that has never been
//! queried scores exactly zero.

use serde::Serialize;

/// Elapsed time at which the headline score is reported
pub const SCORE_HORIZON: f64 = 10.0;

/// Default number of samples in a decay curve
pub const DEFAULT_CURVE_SAMPLES: usize = 25;

/// Default spacing between decay curve samples
pub const DEFAULT_CURVE_STEP: f64 = 2.0;

/// Computes the relevance score. Total for every input; negative `elapsed`
/// yields a score above the undecayed value.
pub fn score(confidence: f64, usage: u32, decay_rate: f64, elapsed: f64) -> f64 {
    let utility = (1.0 + usage as f64).log2();
    if utility == 0.0 {
        return 0.0;
    }
    confidence * utility * (-decay_rate * elapsed).exp()
}

/// Score after `SCORE_HORIZON` units of logical time
pub fn score_at_horizon(confidence: f64, usage: u32, decay_rate: f64) -> f64 {
    score(confidence, usage, decay_rate, SCORE_HORIZON)
}

/// One sample of a decay curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub elapsed: f64,
    pub score: f64,
}

/// Samples the score at `t = 0, step, 2·step, …` for `samples` points
pub fn decay_curve(
    confidence: f64,
    usage: u32,
    decay_rate: f64,
    samples: usize,
    step: f64,
) -> Vec<CurvePoint> {
    (0..samples)
        .map(|i| {
            let elapsed = i as f64 * step;
            CurvePoint {
                elapsed,
                score: score(confidence, usage, decay_rate, elapsed),
            }
        })
        .collect()
}
