//! Minimal kinematic ball stub.
//!
//! Stands in for the out-of-scope rigid-body engine so the session can be
//! exercised headlessly: straight-line motion, perfectly elastic wall
//! reflection, and goal-mouth crossing detection. It implements the same
//! command surface the real physics collaborator would.

use std::cell::RefCell;
use std::rc::Rc;

use bp_core::{
    BodyTag, ContactEvent, PhysicsControl, Vec2, BALL_RADIUS, FIELD_CENTER, FIELD_HEIGHT,
    FIELD_WIDTH, GOAL_WIDTH,
};

/// Wall thickness of the field boundary bodies.
const WALL: f64 = 10.0;

/// Velocity is expressed in pixels per 60Hz frame, as the original physics
/// engine did; one frame is ~16.67ms of wall time.
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug)]
struct BallBody {
    position: Vec2,
    velocity: Vec2,
}

/// Shared ball state: the session commands it through `PhysicsControl`, the
/// driver advances it between ticks.
#[derive(Debug, Clone)]
pub struct BallStub {
    body: Rc<RefCell<BallBody>>,
}

impl Default for BallStub {
    fn default() -> Self {
        Self {
            body: Rc::new(RefCell::new(BallBody {
                position: FIELD_CENTER,
                velocity: Vec2::ZERO,
            })),
        }
    }
}

impl PhysicsControl for BallStub {
    fn set_velocity(&mut self, velocity: Vec2) {
        self.body.borrow_mut().velocity = velocity;
    }

    fn set_position(&mut self, position: Vec2) {
        self.body.borrow_mut().position = position;
    }
}

impl BallStub {
    pub fn position(&self) -> Vec2 {
        self.body.borrow().position
    }

    /// Advance the ball by `dt_ms`, reflecting off walls and reporting a
    /// contact event when the ball crosses a goal mouth.
    pub fn advance(&self, dt_ms: u64) -> Vec<ContactEvent> {
        let mut body = self.body.borrow_mut();
        let frames = dt_ms as f64 / FRAME_MS;
        let mut contacts = Vec::new();

        let min_x = WALL + BALL_RADIUS;
        let max_x = FIELD_WIDTH - WALL - BALL_RADIUS;
        let min_y = WALL + BALL_RADIUS;
        let max_y = FIELD_HEIGHT - WALL - BALL_RADIUS;
        let goal_half = GOAL_WIDTH / 2.0;

        body.position.x += body.velocity.x * frames;
        body.position.y += body.velocity.y * frames;

        // Side walls always reflect.
        if body.position.x < min_x {
            body.position.x = 2.0 * min_x - body.position.x;
            body.velocity.x = -body.velocity.x;
        } else if body.position.x > max_x {
            body.position.x = 2.0 * max_x - body.position.x;
            body.velocity.x = -body.velocity.x;
        }

        // End walls reflect outside the goal mouth, score inside it.
        let in_goal_mouth = (body.position.x - FIELD_WIDTH / 2.0).abs() <= goal_half;
        if body.position.y < min_y {
            if in_goal_mouth {
                contacts.push(ContactEvent::new(BodyTag::Ball, BodyTag::UpperGoal));
                body.velocity = Vec2::ZERO;
            } else {
                body.position.y = 2.0 * min_y - body.position.y;
                body.velocity.y = -body.velocity.y;
            }
        } else if body.position.y > max_y {
            if in_goal_mouth {
                contacts.push(ContactEvent::new(BodyTag::Ball, BodyTag::LowerGoal));
                body.velocity = Vec2::ZERO;
            } else {
                body.position.y = 2.0 * max_y - body.position.y;
                body.velocity.y = -body.velocity.y;
            }
        }

        contacts
    }
}
