//! # bp_core - Bounce Pitch Match Session Engine
//!
//! Core engine for a short, timed, two-goal bouncing-ball match with
//! fixed-stake wagering on the outcome. The crate owns the match state
//! machine (idle → running → paused-for-goal → running → ended), the
//! goal-detection reaction pipeline, and the wager settlement engine that
//! resolves confirmed bets against the final score.
//!
//! ## What lives outside
//! - The rigid-body physics simulation: consumed only through its contact
//!   events and the ball velocity/position command surface.
//! - Rendering, DOM, and styling: notified through `SessionObserver`.
//! - Balance persistence: state is process-lifetime only.
//!
//! ## Driving a session
//! The engine is single-threaded and cooperative. An external driver calls
//! [`session::MatchSession::tick`] on a fixed cadence (100ms recommended) and
//! forwards contact events after each tick; every operation completes within
//! one logical step. Timer callbacks capture the session epoch so a reset
//! turns stale callbacks into no-ops.

pub mod clock;
pub mod config;
pub mod error;
pub mod field;
pub mod markets;
pub mod session;

pub use clock::{ClockDisplay, ClockTick, MatchClock};
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use field::{
    draw_kickoff_velocity, Vec2, BALL_RADIUS, FIELD_CENTER, FIELD_HEIGHT, FIELD_WIDTH, GOAL_WIDTH,
    KICKOFF_VELOCITIES,
};
pub use markets::evaluator::{evaluate, MatchOutcome};
pub use markets::ledger::{
    payout, GroupSettlement, GroupStatus, SelectionState, SettlementSummary, WagerGroup,
    WagerLedger, WagerResult, WagerSelection,
};
pub use markets::{
    Market, MarketOutcome, OddsTable, ParityOutcome, ResultOutcome, TotalOutcome, DEFAULT_ODDS,
};
pub use session::collaborators::{NullObserver, NullPhysics, PhysicsControl, SessionObserver};
pub use session::contact::{BodyTag, ContactEvent, GoalSensor};
pub use session::{MatchPhase, MatchSession, Score, TickOutcome};
