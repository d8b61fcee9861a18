//! Match session state machine.
//!
//! Owns the phase, score, clock, and wager ledger for one timed two-goal
//! match, and orchestrates the goal reaction pipeline between the physics
//! collaborator and settlement. Everything is single-threaded and
//! cooperative: an external driver calls `tick` on a fixed cadence and
//! forwards contact events; no operation blocks.
//!
//! Stale-callback safety comes from a generation counter rather than timer
//! cancellation: `reset` bumps the epoch, and any `tick` carrying an old
//! epoch is a no-op.

pub mod collaborators;
pub mod contact;

#[cfg(test)]
mod session_tests;

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::clock::{ClockDisplay, ClockTick, MatchClock};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::field::{draw_kickoff_velocity, Vec2, FIELD_CENTER};
use crate::markets::evaluator::{evaluate, MatchOutcome};
use crate::markets::ledger::{
    SelectionState, SettlementSummary, WagerGroup, WagerLedger, WagerSelection,
};
use crate::markets::{MarketOutcome, OddsTable};

use collaborators::{PhysicsControl, SessionObserver};
use contact::{ContactEvent, GoalSensor};

/// Match phase; exactly one is active at a time and every operation is
/// legal only in the phases that name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// No wagers confirmed, ball at rest.
    Idle,
    /// Wagers confirmed, waiting for the kickoff velocity assignment.
    AwaitingKickoff,
    /// Clock counting down, goals honored.
    Running,
    /// Goal scored; clock frozen until the dwell interval elapses.
    PausedForGoal,
    /// Clock expired and wagers settled. Only a full reset leaves this.
    Ended,
}

/// Current score. Monotonically non-decreasing within a session; zeroed only
/// by an explicit reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn total(&self) -> u32 {
        self.home + self.away
    }
}

/// What a `tick` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Epoch mismatch: the callback belongs to a session generation that was
    /// reset away. Nothing happened.
    Stale,
    /// Clock stopped or paused; nothing advanced.
    Idle,
    /// Clock advanced normally.
    Running,
    /// The dwell interval ended this tick: ball respawned, play resumed.
    Resumed,
    /// The clock expired this tick: match ended and wagers were settled.
    Ended,
}

/// One timed match session with its wager ledger and collaborators.
pub struct MatchSession {
    config: SessionConfig,
    odds: OddsTable,
    phase: MatchPhase,
    score: Score,
    clock: MatchClock,
    ledger: WagerLedger,
    rng: ChaCha8Rng,
    /// Wall-clock deadline for the post-goal dwell, when paused for a goal.
    dwell_deadline_ms: Option<u64>,
    /// Session generation; bumped on reset to invalidate stale callbacks.
    epoch: u64,
    physics: Box<dyn PhysicsControl>,
    observer: Box<dyn SessionObserver>,
    final_outcome: Option<MatchOutcome>,
    settlement: Option<SettlementSummary>,
}

impl MatchSession {
    /// New session with an entropy-seeded kickoff RNG.
    pub fn new(
        config: SessionConfig,
        odds: OddsTable,
        physics: Box<dyn PhysicsControl>,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        Self::with_seed(config, odds, physics, observer, rand::random())
    }

    /// New session with a fixed seed for deterministic kickoff/respawn draws.
    pub fn with_seed(
        config: SessionConfig,
        odds: OddsTable,
        physics: Box<dyn PhysicsControl>,
        observer: Box<dyn SessionObserver>,
        seed: u64,
    ) -> Self {
        let clock = MatchClock::new(config.total_duration_ms);
        let ledger = WagerLedger::new(config.initial_balance, config.fixed_stake);
        Self {
            config,
            odds,
            phase: MatchPhase::Idle,
            score: Score::default(),
            clock,
            ledger,
            rng: ChaCha8Rng::seed_from_u64(seed),
            dwell_deadline_ms: None,
            epoch: 0,
            physics,
            observer,
            final_outcome: None,
            settlement: None,
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn remaining(&self) -> ClockDisplay {
        self.clock.remaining()
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn pending_wagers(&self) -> &[WagerSelection] {
        self.ledger.pending()
    }

    pub fn wager_history(&self) -> &[WagerGroup] {
        self.ledger.history()
    }

    /// Current session generation. Timer drivers capture this when they
    /// schedule a callback and pass it back into `tick`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Final categorical outcome, available once Ended.
    pub fn final_outcome(&self) -> Option<&MatchOutcome> {
        self.final_outcome.as_ref()
    }

    /// Settlement of this session's wagers, available once Ended.
    pub fn settlement(&self) -> Option<&SettlementSummary> {
        self.settlement.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // =========================================================================
    // Wager commands (bets open only before kickoff)
    // =========================================================================

    fn require_bets_open(&self, operation: &'static str) -> Result<()> {
        match self.phase {
            MatchPhase::Idle | MatchPhase::AwaitingKickoff => Ok(()),
            phase => Err(SessionError::IllegalTransition { operation, phase }),
        }
    }

    /// Select, replace, or toggle-off a pending outcome for its market.
    pub fn select_wager(&mut self, outcome: MarketOutcome) -> Result<SelectionState> {
        self.require_bets_open("select_wager")?;
        let odds = self.odds.odds(outcome);
        Ok(self.ledger.select(outcome, odds))
    }

    /// Drop all pending selections.
    pub fn clear_wagers(&mut self) -> Result<()> {
        self.require_bets_open("clear_wagers")?;
        self.ledger.clear_pending();
        Ok(())
    }

    /// Confirm the pending set into a staked group. On the first confirmed
    /// group the session leaves Idle and waits for kickoff.
    pub fn confirm_wagers(&mut self) -> Result<u64> {
        self.require_bets_open("confirm_wagers")?;
        let group_id = self.ledger.confirm(Utc::now())?.id;
        if self.phase == MatchPhase::Idle {
            self.set_phase(MatchPhase::AwaitingKickoff);
        }
        Ok(group_id)
    }

    // =========================================================================
    // Match commands
    // =========================================================================

    /// Assign a random kickoff velocity and start the clock.
    pub fn kick_off(&mut self, now_ms: u64) -> Result<()> {
        if self.phase != MatchPhase::AwaitingKickoff {
            return Err(SessionError::IllegalTransition {
                operation: "kick_off",
                phase: self.phase,
            });
        }

        let velocity = draw_kickoff_velocity(&mut self.rng);
        self.physics.set_velocity(velocity);
        self.clock.start(now_ms);
        self.set_phase(MatchPhase::Running);
        log::info!("kickoff with velocity ({}, {})", velocity.x, velocity.y);
        Ok(())
    }

    /// Feed one contact notification through the goal pipeline.
    ///
    /// Honored only while Running; contacts in any other phase are dropped,
    /// which prevents double-scoring during the respawn window and scoring
    /// before kickoff or after full time. Returns whether a goal was scored.
    pub fn handle_contact(&mut self, now_ms: u64, contact: ContactEvent) -> bool {
        let Some(side) = contact.goal_side() else {
            return false;
        };

        if self.phase != MatchPhase::Running {
            log::debug!("contact on {side:?} sensor ignored in phase {:?}", self.phase);
            return false;
        }

        if side.scoring_side_is_home() {
            self.score.home += 1;
        } else {
            self.score.away += 1;
        }
        log::info!(
            "goal at {} sensor, score {}-{}",
            match side {
                GoalSensor::Upper => "upper",
                GoalSensor::Lower => "lower",
            },
            self.score.home,
            self.score.away
        );

        self.observer.on_score_changed(self.score.home, self.score.away);
        self.observer.on_goal(side);
        self.clock.pause();
        self.dwell_deadline_ms = Some(now_ms + self.config.dwell_ms);
        self.set_phase(MatchPhase::PausedForGoal);
        true
    }

    /// Advance the session to `now_ms`.
    ///
    /// Driver contract: deliver `tick` before any contacts batched for the
    /// same instant, so expiry is evaluated first and a late contact cannot
    /// score after full time (the phase guard then drops it).
    pub fn tick(&mut self, epoch: u64, now_ms: u64) -> TickOutcome {
        if epoch != self.epoch {
            log::debug!("dropping stale tick for epoch {epoch} (current {})", self.epoch);
            return TickOutcome::Stale;
        }

        let mut resumed = false;
        if self.phase == MatchPhase::PausedForGoal {
            if let Some(deadline) = self.dwell_deadline_ms {
                if now_ms >= deadline {
                    self.respawn_ball();
                    self.dwell_deadline_ms = None;
                    self.clock.resume(now_ms);
                    self.set_phase(MatchPhase::Running);
                    resumed = true;
                }
            }
        }

        match self.clock.tick(now_ms) {
            ClockTick::Expired => {
                self.observer.on_time_changed(self.clock.remaining());
                self.finish();
                TickOutcome::Ended
            }
            ClockTick::Running => {
                self.observer.on_time_changed(self.clock.remaining());
                if resumed {
                    TickOutcome::Resumed
                } else {
                    TickOutcome::Running
                }
            }
            ClockTick::Idle => TickOutcome::Idle,
        }
    }

    /// Full reset back to Idle: new epoch, zero score, fresh clock, pending
    /// wagers dropped. Settled history and balance effects are final and
    /// survive.
    ///
    /// A reset issued mid-match ends the abandoned match: any still-open
    /// wager groups settle against the score as it stands, so no group ever
    /// crosses a session boundary unsettled and the next match can never
    /// resolve a bet it was not wagered on.
    pub fn reset(&mut self) {
        self.epoch += 1;

        if self.ledger.has_open_groups() {
            let outcome = evaluate(
                self.score.home,
                self.score.away,
                self.config.total_goals_threshold,
            );
            let summary = self.ledger.settle(&outcome);
            log::info!(
                "match abandoned at {}-{}, settled {} open group(s)",
                self.score.home,
                self.score.away,
                summary.groups.len()
            );
            self.observer.on_settlement(&summary);
        }

        self.phase = MatchPhase::Idle;
        self.score = Score::default();
        self.clock.reset();
        self.dwell_deadline_ms = None;
        self.final_outcome = None;
        self.settlement = None;
        self.ledger.reset_for_new_session();

        self.physics.set_position(FIELD_CENTER);
        self.physics.set_velocity(Vec2::ZERO);

        self.observer.on_phase_changed(self.phase);
        self.observer.on_score_changed(0, 0);
        self.observer.on_time_changed(self.clock.remaining());
        log::info!("session reset to epoch {}", self.epoch);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn set_phase(&mut self, phase: MatchPhase) {
        self.phase = phase;
        self.observer.on_phase_changed(phase);
    }

    /// Re-centre the ball with a freshly drawn kickoff velocity.
    fn respawn_ball(&mut self) {
        let velocity = draw_kickoff_velocity(&mut self.rng);
        self.physics.set_position(FIELD_CENTER);
        self.physics.set_velocity(velocity);
        log::debug!("ball respawned with velocity ({}, {})", velocity.x, velocity.y);
    }

    /// Clock expired while Running: evaluate the final score and settle.
    fn finish(&mut self) {
        debug_assert_eq!(self.phase, MatchPhase::Running, "expiry outside Running");

        let outcome = evaluate(
            self.score.home,
            self.score.away,
            self.config.total_goals_threshold,
        );
        let summary = self.ledger.settle(&outcome);
        log::info!(
            "full time {}-{}, returned {} on {} staked",
            self.score.home,
            self.score.away,
            summary.total_returned,
            summary.total_staked
        );

        self.set_phase(MatchPhase::Ended);
        self.observer.on_settlement(&summary);
        self.final_outcome = Some(outcome);
        self.settlement = Some(summary);
    }
}
