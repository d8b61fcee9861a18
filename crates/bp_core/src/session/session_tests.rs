//! End-to-end session scenarios with recording collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use super::collaborators::{NullObserver, NullPhysics, PhysicsControl, SessionObserver};
use super::contact::{BodyTag, ContactEvent, GoalSensor};
use super::{MatchPhase, MatchSession, TickOutcome};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::field::{Vec2, FIELD_CENTER, KICKOFF_VELOCITIES};
use crate::markets::ledger::{GroupStatus, SelectionState};
use crate::markets::{
    MarketOutcome, OddsTable, ParityOutcome, ResultOutcome, TotalOutcome,
};

/// Physics stub that records every command it receives.
#[derive(Debug, Default)]
struct RecordingPhysics {
    velocities: Rc<RefCell<Vec<Vec2>>>,
    positions: Rc<RefCell<Vec<Vec2>>>,
}

impl RecordingPhysics {
    fn handles(&self) -> (Rc<RefCell<Vec<Vec2>>>, Rc<RefCell<Vec<Vec2>>>) {
        (Rc::clone(&self.velocities), Rc::clone(&self.positions))
    }
}

impl PhysicsControl for RecordingPhysics {
    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocities.borrow_mut().push(velocity);
    }

    fn set_position(&mut self, position: Vec2) {
        self.positions.borrow_mut().push(position);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Note {
    Phase(MatchPhase),
    Score(u32, u32),
    Goal(GoalSensor),
    Settlement { total_returned: u64 },
}

/// Observer that keeps an ordered log of notifications.
#[derive(Debug, Default)]
struct RecordingObserver {
    notes: Rc<RefCell<Vec<Note>>>,
}

impl RecordingObserver {
    fn handle(&self) -> Rc<RefCell<Vec<Note>>> {
        Rc::clone(&self.notes)
    }
}

impl SessionObserver for RecordingObserver {
    fn on_phase_changed(&mut self, phase: MatchPhase) {
        self.notes.borrow_mut().push(Note::Phase(phase));
    }

    fn on_score_changed(&mut self, home: u32, away: u32) {
        self.notes.borrow_mut().push(Note::Score(home, away));
    }

    fn on_goal(&mut self, side: GoalSensor) {
        self.notes.borrow_mut().push(Note::Goal(side));
    }

    fn on_settlement(&mut self, summary: &crate::markets::ledger::SettlementSummary) {
        self.notes.borrow_mut().push(Note::Settlement {
            total_returned: summary.total_returned,
        });
    }
}

fn session() -> MatchSession {
    MatchSession::with_seed(
        SessionConfig::default(),
        OddsTable::default(),
        Box::new(NullPhysics),
        Box::new(NullObserver),
        42,
    )
}

fn goal_contact(sensor: BodyTag) -> ContactEvent {
    ContactEvent::new(BodyTag::Ball, sensor)
}

fn home() -> MarketOutcome {
    MarketOutcome::Result(ResultOutcome::Home)
}

#[test]
fn test_initial_state() {
    let session = session();
    assert_eq!(session.phase(), MatchPhase::Idle);
    assert_eq!(session.score().total(), 0);
    assert_eq!(session.balance(), 10_000);
    assert_eq!(session.remaining().format(), "00:45");
}

#[test]
fn test_confirm_moves_idle_to_awaiting_kickoff() {
    let mut session = session();
    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    assert_eq!(session.phase(), MatchPhase::AwaitingKickoff);
    assert_eq!(session.balance(), 9_900);
}

#[test]
fn test_confirm_without_selection_stays_idle() {
    let mut session = session();
    assert_eq!(session.confirm_wagers(), Err(SessionError::NoSelections));
    assert_eq!(session.phase(), MatchPhase::Idle);
}

#[test]
fn test_kick_off_requires_confirmed_wagers() {
    let mut session = session();
    let err = session.kick_off(0).unwrap_err();
    assert_eq!(
        err,
        SessionError::IllegalTransition {
            operation: "kick_off",
            phase: MatchPhase::Idle
        }
    );
}

#[test]
fn test_kick_off_assigns_table_velocity_and_starts_clock() {
    let physics = RecordingPhysics::default();
    let (velocities, _) = physics.handles();
    let mut session = MatchSession::with_seed(
        SessionConfig::default(),
        OddsTable::default(),
        Box::new(physics),
        Box::new(NullObserver),
        1,
    );

    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();

    assert_eq!(session.phase(), MatchPhase::Running);
    let sent = velocities.borrow();
    assert_eq!(sent.len(), 1);
    assert!(KICKOFF_VELOCITIES.contains(&sent[0]));

    drop(sent);
    assert_eq!(session.tick(session.epoch(), 100), TickOutcome::Running);
}

#[test]
fn test_betting_closed_once_running() {
    let mut session = session();
    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();

    assert_eq!(
        session.select_wager(MarketOutcome::Parity(ParityOutcome::Odd)),
        Err(SessionError::IllegalTransition {
            operation: "select_wager",
            phase: MatchPhase::Running
        })
    );
    assert_eq!(
        session.clear_wagers(),
        Err(SessionError::IllegalTransition {
            operation: "clear_wagers",
            phase: MatchPhase::Running
        })
    );
}

#[test]
fn test_goal_pauses_and_dwell_resumes() {
    let physics = RecordingPhysics::default();
    let (velocities, positions) = physics.handles();
    let mut session = MatchSession::with_seed(
        SessionConfig::default(),
        OddsTable::default(),
        Box::new(physics),
        Box::new(NullObserver),
        3,
    );
    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();

    session.tick(session.epoch(), 10_000);
    assert!(session.handle_contact(10_000, goal_contact(BodyTag::UpperGoal)));
    assert_eq!(session.phase(), MatchPhase::PausedForGoal);
    assert_eq!(session.score().home, 1);

    // Clock is frozen during the dwell.
    assert_eq!(session.tick(session.epoch(), 11_000), TickOutcome::Idle);

    // Dwell deadline (2s) reached: respawn at centre, fresh velocity, Running.
    assert_eq!(session.tick(session.epoch(), 12_000), TickOutcome::Resumed);
    assert_eq!(session.phase(), MatchPhase::Running);
    assert_eq!(positions.borrow().last(), Some(&FIELD_CENTER));
    assert_eq!(velocities.borrow().len(), 2); // kickoff + respawn
}

#[test]
fn test_contact_ignored_outside_running() {
    let mut session = session();

    // Before kickoff.
    assert!(!session.handle_contact(0, goal_contact(BodyTag::UpperGoal)));
    assert_eq!(session.score().total(), 0);

    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();

    // Still awaiting kickoff.
    assert!(!session.handle_contact(0, goal_contact(BodyTag::LowerGoal)));
    assert_eq!(session.score().total(), 0);

    session.kick_off(0).unwrap();
    session.handle_contact(5_000, goal_contact(BodyTag::UpperGoal));

    // During the dwell window a second contact must not double-score.
    assert!(!session.handle_contact(5_100, goal_contact(BodyTag::UpperGoal)));
    assert_eq!(session.score(), super::Score { home: 1, away: 0 });
}

#[test]
fn test_expiry_settles_and_blocks_late_contacts() {
    let observer = RecordingObserver::default();
    let notes = observer.handle();
    let mut session = MatchSession::with_seed(
        SessionConfig::default(),
        OddsTable::default(),
        Box::new(NullPhysics),
        Box::new(observer),
        7,
    );

    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();

    // Home scores twice, away once: 2-1.
    for (at, sensor) in [
        (5_000, BodyTag::UpperGoal),
        (15_000, BodyTag::UpperGoal),
        (25_000, BodyTag::LowerGoal),
    ] {
        session.tick(session.epoch(), at);
        assert!(session.handle_contact(at, goal_contact(sensor)));
        session.tick(session.epoch(), at + 2_000);
    }

    // Three 2s dwells shift expiry from 45s to 51s of wall time.
    assert_eq!(session.tick(session.epoch(), 51_000), TickOutcome::Ended);
    assert_eq!(session.phase(), MatchPhase::Ended);

    // Home @1.8 on a 2-1 final: 100 staked, 180 back.
    assert_eq!(session.balance(), 9_900 + 180);
    let outcome = session.final_outcome().unwrap();
    assert_eq!(outcome.result, ResultOutcome::Home);
    assert_eq!(outcome.total, TotalOutcome::Under);
    assert_eq!(outcome.parity, ParityOutcome::Odd);
    assert!(notes
        .borrow()
        .contains(&Note::Settlement { total_returned: 180 }));

    // A contact arriving after full time is dropped by the phase guard.
    assert!(!session.handle_contact(51_050, goal_contact(BodyTag::UpperGoal)));
    assert_eq!(session.score(), super::Score { home: 2, away: 1 });

    // Settlement is not re-run by further ticks.
    assert_eq!(session.tick(session.epoch(), 52_000), TickOutcome::Idle);
    assert_eq!(session.balance(), 10_080);
}

#[test]
fn test_reset_invalidates_stale_ticks_and_keeps_history() {
    let mut session = session();
    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();
    session.tick(session.epoch(), 45_000);
    assert_eq!(session.phase(), MatchPhase::Ended);

    let old_epoch = session.epoch();
    session.reset();

    assert_eq!(session.phase(), MatchPhase::Idle);
    assert_eq!(session.score().total(), 0);
    assert_eq!(session.remaining().format(), "00:45");
    // Settled group survives as history; balance effects are final.
    assert_eq!(session.wager_history().len(), 1);
    assert!(session.pending_wagers().is_empty());

    // A timer callback scheduled before the reset is a no-op now.
    assert_eq!(session.tick(old_epoch, 46_000), TickOutcome::Stale);
    assert_eq!(session.phase(), MatchPhase::Idle);
}

#[test]
fn test_reset_mid_match_settles_open_groups_against_abandoned_score() {
    let mut session = session();
    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();
    session.tick(session.epoch(), 10_000);

    // Abandon at 0-0: the open group settles now, as a loss for home.
    session.reset();
    assert_eq!(session.wager_history()[0].status, GroupStatus::Settled);
    assert_eq!(session.balance(), 9_900);

    // The next match settles only its own group.
    session
        .select_wager(MarketOutcome::Result(ResultOutcome::Draw))
        .unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();
    session.tick(session.epoch(), 45_000);

    let summary = session.settlement().unwrap();
    assert_eq!(summary.groups.len(), 1);
    assert_eq!(summary.groups[0].group_id, session.wager_history()[1].id);
    // Draw @3.2 on the 0-0 second match: 9_800 staked down, 320 back.
    assert_eq!(session.balance(), 10_120);
}

#[test]
fn test_reset_during_goal_pause_settles_at_current_score() {
    let mut session = session();
    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();
    session.handle_contact(5_000, goal_contact(BodyTag::UpperGoal));
    assert_eq!(session.phase(), MatchPhase::PausedForGoal);

    // Abandon at 1-0: home already leads, so the group settles as a win.
    session.reset();
    assert_eq!(session.phase(), MatchPhase::Idle);
    assert_eq!(session.wager_history()[0].status, GroupStatus::Settled);
    assert_eq!(session.balance(), 10_080);
}

#[test]
fn test_short_match_preset_end_to_end() {
    let mut session = MatchSession::with_seed(
        SessionConfig::short_match(),
        OddsTable::default(),
        Box::new(NullPhysics),
        Box::new(NullObserver),
        9,
    );
    session
        .select_wager(MarketOutcome::Parity(ParityOutcome::Even))
        .unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();

    session.tick(session.epoch(), 1_000);
    session.handle_contact(1_000, goal_contact(BodyTag::UpperGoal));

    // Compressed 500ms dwell.
    assert_eq!(session.tick(session.epoch(), 1_500), TickOutcome::Resumed);

    // 5s match plus one 500ms dwell ends at 5.5s of wall time.
    assert_eq!(session.tick(session.epoch(), 5_500), TickOutcome::Ended);
    // 1-0 is an odd total, so the even selection loses its stake.
    assert_eq!(session.balance(), 9_900);
}

#[test]
fn test_reset_recentres_a_stationary_ball() {
    let physics = RecordingPhysics::default();
    let (velocities, positions) = physics.handles();
    let mut session = MatchSession::with_seed(
        SessionConfig::default(),
        OddsTable::default(),
        Box::new(physics),
        Box::new(NullObserver),
        11,
    );

    session.reset();
    assert_eq!(positions.borrow().last(), Some(&FIELD_CENTER));
    assert_eq!(velocities.borrow().last(), Some(&Vec2::ZERO));
}

#[test]
fn test_selection_toggle_through_session_api() {
    let mut session = session();
    let odd = MarketOutcome::Parity(ParityOutcome::Odd);
    let even = MarketOutcome::Parity(ParityOutcome::Even);

    assert_eq!(session.select_wager(odd).unwrap(), SelectionState::Selected);
    assert_eq!(session.select_wager(odd).unwrap(), SelectionState::Cleared);
    assert!(session.pending_wagers().is_empty());

    session.select_wager(odd).unwrap();
    assert_eq!(session.select_wager(even).unwrap(), SelectionState::Replaced);
    assert_eq!(session.pending_wagers().len(), 1);
    assert_eq!(session.pending_wagers()[0].outcome, even);
}

#[test]
fn test_observer_sees_phase_and_score_flow() {
    let observer = RecordingObserver::default();
    let notes = observer.handle();
    let mut session = MatchSession::with_seed(
        SessionConfig::default(),
        OddsTable::default(),
        Box::new(NullPhysics),
        Box::new(observer),
        5,
    );

    session.select_wager(home()).unwrap();
    session.confirm_wagers().unwrap();
    session.kick_off(0).unwrap();
    session.handle_contact(9_000, goal_contact(BodyTag::LowerGoal));

    let notes = notes.borrow();
    let expected_prefix = [
        Note::Phase(MatchPhase::AwaitingKickoff),
        Note::Phase(MatchPhase::Running),
        Note::Score(0, 1),
        Note::Goal(GoalSensor::Lower),
        Note::Phase(MatchPhase::PausedForGoal),
    ];
    assert_eq!(&notes[..expected_prefix.len()], &expected_prefix);
}
