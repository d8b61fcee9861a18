//! Contact event interpretation.
//!
//! The physics collaborator reports raw body pairs on collision start. The
//! core only cares whether one side is the ball and the other a goal-mouth
//! sensor; everything else (walls, field markings, secondary entities) is
//! noise at this layer.

use serde::{Deserialize, Serialize};

/// How the session classifies a physics body involved in a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyTag {
    Ball,
    UpperGoal,
    LowerGoal,
    /// Walls, markings, decorative entities.
    Other,
}

/// Which goal mouth the ball entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSensor {
    Upper,
    Lower,
}

impl GoalSensor {
    /// The upper goal mouth credits the home side, the lower the away side.
    pub fn scoring_side_is_home(&self) -> bool {
        matches!(self, GoalSensor::Upper)
    }
}

/// One collision-start notification from the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: BodyTag,
    pub b: BodyTag,
}

impl ContactEvent {
    pub fn new(a: BodyTag, b: BodyTag) -> Self {
        Self { a, b }
    }

    /// A contact counts as a goal iff one side is the ball and the other a
    /// goal sensor, in either order.
    pub fn goal_side(&self) -> Option<GoalSensor> {
        match (self.a, self.b) {
            (BodyTag::Ball, BodyTag::UpperGoal) | (BodyTag::UpperGoal, BodyTag::Ball) => {
                Some(GoalSensor::Upper)
            }
            (BodyTag::Ball, BodyTag::LowerGoal) | (BodyTag::LowerGoal, BodyTag::Ball) => {
                Some(GoalSensor::Lower)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_side_either_order() {
        let upper = ContactEvent::new(BodyTag::Ball, BodyTag::UpperGoal);
        assert_eq!(upper.goal_side(), Some(GoalSensor::Upper));

        let flipped = ContactEvent::new(BodyTag::LowerGoal, BodyTag::Ball);
        assert_eq!(flipped.goal_side(), Some(GoalSensor::Lower));
    }

    #[test]
    fn test_non_goal_contacts_ignored() {
        assert_eq!(
            ContactEvent::new(BodyTag::Ball, BodyTag::Other).goal_side(),
            None
        );
        assert_eq!(
            ContactEvent::new(BodyTag::Other, BodyTag::UpperGoal).goal_side(),
            None
        );
        // Two sensors touching each other is not a goal.
        assert_eq!(
            ContactEvent::new(BodyTag::UpperGoal, BodyTag::LowerGoal).goal_side(),
            None
        );
    }

    #[test]
    fn test_scoring_side_mapping() {
        assert!(GoalSensor::Upper.scoring_side_is_home());
        assert!(!GoalSensor::Lower.scoring_side_is_home());
    }
}
