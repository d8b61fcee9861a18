//! External collaborator interfaces.
//!
//! The physics simulation and the presentation layer live outside the core.
//! Physics receives fire-and-forget body commands; the observer receives
//! read-only notifications. Neither can mutate core state directly.

use crate::clock::ClockDisplay;
use crate::field::Vec2;
use crate::markets::ledger::SettlementSummary;
use crate::session::contact::GoalSensor;
use crate::session::MatchPhase;

/// Command surface into the physics collaborator for the ball body.
pub trait PhysicsControl {
    fn set_velocity(&mut self, velocity: Vec2);
    fn set_position(&mut self, position: Vec2);
}

/// Purely observational presentation hooks. All methods default to no-ops so
/// observers implement only what they display.
pub trait SessionObserver {
    fn on_phase_changed(&mut self, _phase: MatchPhase) {}
    fn on_score_changed(&mut self, _home: u32, _away: u32) {}
    fn on_time_changed(&mut self, _remaining: ClockDisplay) {}
    /// Transient goal announcement for the scoring side.
    fn on_goal(&mut self, _side: GoalSensor) {}
    fn on_settlement(&mut self, _summary: &SettlementSummary) {}
}

/// Physics sink that discards every command.
#[derive(Debug, Default)]
pub struct NullPhysics;

impl PhysicsControl for NullPhysics {
    fn set_velocity(&mut self, _velocity: Vec2) {}
    fn set_position(&mut self, _position: Vec2) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}
