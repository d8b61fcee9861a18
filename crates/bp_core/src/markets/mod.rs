//! Wager markets: outcome categories, odds configuration, evaluation, ledger.
//!
//! Three markets are offered on a match: the result (home/draw/away), the
//! total-goal threshold (over/under a half-integer line), and the parity of
//! the total (odd/even). Odds are a static table loaded at session
//! construction and immutable thereafter.

pub mod evaluator;
pub mod ledger;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A wager category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    MatchResult,
    TotalGoals,
    Parity,
}

/// Match result market outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOutcome {
    Home,
    Draw,
    Away,
}

/// Total-goal threshold market outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalOutcome {
    Over,
    Under,
}

/// Total-goal parity market outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParityOutcome {
    Odd,
    Even,
}

/// One concrete selectable outcome, tagged with its market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketOutcome {
    Result(ResultOutcome),
    Total(TotalOutcome),
    Parity(ParityOutcome),
}

impl MarketOutcome {
    /// The market this outcome belongs to.
    pub fn market(&self) -> Market {
        match self {
            MarketOutcome::Result(_) => Market::MatchResult,
            MarketOutcome::Total(_) => Market::TotalGoals,
            MarketOutcome::Parity(_) => Market::Parity,
        }
    }

    /// Human-readable name for slips and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            MarketOutcome::Result(ResultOutcome::Home) => "Home",
            MarketOutcome::Result(ResultOutcome::Draw) => "Draw",
            MarketOutcome::Result(ResultOutcome::Away) => "Away",
            MarketOutcome::Total(TotalOutcome::Over) => "Over",
            MarketOutcome::Total(TotalOutcome::Under) => "Under",
            MarketOutcome::Parity(ParityOutcome::Odd) => "Odd",
            MarketOutcome::Parity(ParityOutcome::Even) => "Even",
        }
    }
}

/// Immutable `{market, outcome} -> odds` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsTable {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    pub over: f64,
    pub under: f64,
    pub odd: f64,
    pub even: f64,
}

impl Default for OddsTable {
    fn default() -> Self {
        Self {
            home: 1.8,
            draw: 3.2,
            away: 2.1,
            over: 1.9,
            under: 1.8,
            odd: 1.9,
            even: 1.9,
        }
    }
}

impl OddsTable {
    /// Odds for a concrete outcome.
    pub fn odds(&self, outcome: MarketOutcome) -> f64 {
        match outcome {
            MarketOutcome::Result(ResultOutcome::Home) => self.home,
            MarketOutcome::Result(ResultOutcome::Draw) => self.draw,
            MarketOutcome::Result(ResultOutcome::Away) => self.away,
            MarketOutcome::Total(TotalOutcome::Over) => self.over,
            MarketOutcome::Total(TotalOutcome::Under) => self.under,
            MarketOutcome::Parity(ParityOutcome::Odd) => self.odd,
            MarketOutcome::Parity(ParityOutcome::Even) => self.even,
        }
    }
}

/// Shared default odds table.
pub static DEFAULT_ODDS: Lazy<OddsTable> = Lazy::new(OddsTable::default);
