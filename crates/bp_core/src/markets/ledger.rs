//! Wager ledger: balance, pending selections, confirmed groups, settlement.
//!
//! Pending selections are ephemeral and hold at most one entry per market.
//! Confirming snapshots them atomically into a `WagerGroup` and debits the
//! balance; settlement resolves every outstanding group in one pass and
//! credits winnings. Balance never goes negative by construction: confirm
//! rejects any stake total it cannot cover.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::evaluator::MatchOutcome;
use super::MarketOutcome;
use crate::error::{Result, SessionError};

/// One pending or staked selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagerSelection {
    pub outcome: MarketOutcome,
    pub odds: f64,
    pub stake: u64,
}

impl WagerSelection {
    /// What the selection would return if it wins, under the uniform
    /// rounding rule. Displayed totals reproduce because settlement uses
    /// the same function.
    pub fn potential_payout(&self) -> u64 {
        payout(self.stake, self.odds)
    }
}

/// Stake x odds, rounded half-up to the integer currency unit.
pub fn payout(stake: u64, odds: f64) -> u64 {
    (stake as f64 * odds).round() as u64
}

/// Lifecycle of a confirmed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Pending,
    Settled,
}

/// Per-selection settlement record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagerResult {
    pub selection: WagerSelection,
    pub is_win: bool,
    pub payout: u64,
}

/// One confirmed, atomically-staked bundle of selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerGroup {
    pub id: u64,
    pub placed_at: DateTime<Utc>,
    pub stakes: Vec<WagerSelection>,
    pub status: GroupStatus,
    /// Populated exactly once, when the group is settled.
    pub results: Option<Vec<WagerResult>>,
}

impl WagerGroup {
    pub fn stake_total(&self) -> u64 {
        self.stakes.iter().map(|s| s.stake).sum()
    }
}

/// What happened to the pending set on a `select` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// New selection added for its market.
    Selected,
    /// Existing selection in the same market swapped out.
    Replaced,
    /// Same outcome toggled off.
    Cleared,
}

/// Settlement of a single group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSettlement {
    pub group_id: u64,
    pub results: Vec<WagerResult>,
}

/// Outcome of one settlement pass, for observers and slips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub total_staked: u64,
    pub total_returned: u64,
    pub groups: Vec<GroupSettlement>,
}

/// Account balance, pending selections, and confirmed wager history.
#[derive(Debug, Clone)]
pub struct WagerLedger {
    balance: u64,
    fixed_stake: u64,
    pending: Vec<WagerSelection>,
    history: Vec<WagerGroup>,
    next_group_id: u64,
}

impl WagerLedger {
    pub fn new(initial_balance: u64, fixed_stake: u64) -> Self {
        Self {
            balance: initial_balance,
            fixed_stake,
            pending: Vec::new(),
            history: Vec::new(),
            next_group_id: 1,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn pending(&self) -> &[WagerSelection] {
        &self.pending
    }

    pub fn history(&self) -> &[WagerGroup] {
        &self.history
    }

    pub fn pending_stake_total(&self) -> u64 {
        self.pending.iter().map(|s| s.stake).sum()
    }

    /// Insert, replace, or toggle-off the pending selection for a market.
    ///
    /// At most one selection per market is pending at any time. Re-selecting
    /// the identical outcome cancels it; a different outcome in the same
    /// market replaces it. No balance effect.
    pub fn select(&mut self, outcome: MarketOutcome, odds: f64) -> SelectionState {
        let market = outcome.market();
        if let Some(idx) = self
            .pending
            .iter()
            .position(|s| s.outcome.market() == market)
        {
            if self.pending[idx].outcome == outcome {
                self.pending.remove(idx);
                return SelectionState::Cleared;
            }
            self.pending[idx] = WagerSelection {
                outcome,
                odds,
                stake: self.fixed_stake,
            };
            return SelectionState::Replaced;
        }

        self.pending.push(WagerSelection {
            outcome,
            odds,
            stake: self.fixed_stake,
        });
        SelectionState::Selected
    }

    /// Empty the pending set. No balance effect.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Atomically confirm the pending set into a new `Pending` group.
    ///
    /// Rejects with `NoSelections` or `InsufficientBalance` leaving balance,
    /// pending, and history untouched.
    pub fn confirm(&mut self, placed_at: DateTime<Utc>) -> Result<&WagerGroup> {
        if self.pending.is_empty() {
            return Err(SessionError::NoSelections);
        }

        let stake = self.pending_stake_total();
        if stake > self.balance {
            return Err(SessionError::InsufficientBalance {
                stake,
                balance: self.balance,
            });
        }

        self.balance -= stake;
        let group = WagerGroup {
            id: self.next_group_id,
            placed_at,
            stakes: std::mem::take(&mut self.pending),
            status: GroupStatus::Pending,
            results: None,
        };
        self.next_group_id += 1;
        log::info!(
            "wager group {} confirmed, stake {}, balance {}",
            group.id,
            stake,
            self.balance
        );

        let idx = self.history.len();
        self.history.push(group);
        Ok(&self.history[idx])
    }

    /// Resolve every outstanding `Pending` group against an evaluated
    /// outcome, crediting winnings.
    ///
    /// Idempotent: settled groups are never re-evaluated, so a second pass
    /// cannot double-credit the balance.
    pub fn settle(&mut self, outcome: &MatchOutcome) -> SettlementSummary {
        let mut summary = SettlementSummary {
            total_staked: 0,
            total_returned: 0,
            groups: Vec::new(),
        };

        for group in &mut self.history {
            if group.status == GroupStatus::Settled {
                continue;
            }
            debug_assert!(group.results.is_none(), "pending group carries results");

            let results: Vec<WagerResult> = group
                .stakes
                .iter()
                .map(|selection| {
                    let is_win = outcome.wins(selection.outcome);
                    WagerResult {
                        selection: *selection,
                        is_win,
                        payout: if is_win { selection.potential_payout() } else { 0 },
                    }
                })
                .collect();

            let returned: u64 = results.iter().map(|r| r.payout).sum();
            self.balance += returned;
            summary.total_staked += group.stake_total();
            summary.total_returned += returned;

            group.status = GroupStatus::Settled;
            group.results = Some(results.clone());
            summary.groups.push(GroupSettlement {
                group_id: group.id,
                results,
            });
        }

        if !summary.groups.is_empty() {
            log::info!(
                "settled {} group(s): staked {}, returned {}, balance {}",
                summary.groups.len(),
                summary.total_staked,
                summary.total_returned,
                self.balance
            );
        }
        summary
    }

    /// Whether any confirmed group is still awaiting settlement.
    pub fn has_open_groups(&self) -> bool {
        self.history
            .iter()
            .any(|g| g.status == GroupStatus::Pending)
    }

    /// Drop pending selections on session reset; settled history and balance
    /// effects are final and survive. Confirmed groups must already be
    /// settled by the session before it resets.
    pub fn reset_for_new_session(&mut self) {
        debug_assert!(!self.has_open_groups(), "unsettled group across reset");
        self.pending.clear();
    }
}
