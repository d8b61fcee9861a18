//! Categorical outcome evaluation of a final score.
//!
//! Pure functions only. Settlement correctness is anchored on `evaluate`, so
//! this stays free of session state, clocks, and randomness.

use serde::{Deserialize, Serialize};

use super::{MarketOutcome, ParityOutcome, ResultOutcome, TotalOutcome};

/// The three categorical verdicts a finished match produces, one per market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub result: ResultOutcome,
    pub total: TotalOutcome,
    pub parity: ParityOutcome,
}

impl MatchOutcome {
    /// Whether a selection wins against this outcome.
    pub fn wins(&self, selection: MarketOutcome) -> bool {
        match selection {
            MarketOutcome::Result(r) => r == self.result,
            MarketOutcome::Total(t) => t == self.total,
            MarketOutcome::Parity(p) => p == self.parity,
        }
    }
}

/// Map a final score to its categorical outcomes.
///
/// `total_threshold` must be a half-integer line (e.g. 9.5) so an over/under
/// push is impossible. Deterministic and side-effect free.
pub fn evaluate(home: u32, away: u32, total_threshold: f64) -> MatchOutcome {
    let result = if home > away {
        ResultOutcome::Home
    } else if away > home {
        ResultOutcome::Away
    } else {
        ResultOutcome::Draw
    };

    let total_goals = home + away;
    let total = if f64::from(total_goals) > total_threshold {
        TotalOutcome::Over
    } else {
        TotalOutcome::Under
    };

    let parity = if total_goals % 2 == 1 {
        ParityOutcome::Odd
    } else {
        ParityOutcome::Even
    };

    MatchOutcome {
        result,
        total,
        parity,
    }
}
