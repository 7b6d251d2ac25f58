//! Actions - the one decision an entity submits per turn
//!
//! Actions arrive from external providers, so numeric payloads are kept as
//! raw `f64` until the validator has checked them.

use serde::{Deserialize, Serialize};

use super::{EntityId, ItemId, Position};

/// Raw move target as submitted by a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionTarget {
    pub x: f64,
    pub y: f64,
}

impl ActionTarget {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snap to the grid tile containing this point
    ///
    /// Only meaningful once the target passed validation.
    pub fn to_position(&self) -> Position {
        Position::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl From<Position> for ActionTarget {
    fn from(position: Position) -> Self {
        Self {
            x: f64::from(position.x),
            y: f64::from(position.y),
        }
    }
}

/// An action an entity wants to take this turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    Move {
        actor_id: EntityId,
        target: ActionTarget,
    },
    Attack {
        actor_id: EntityId,
        target_id: EntityId,
    },
    SkillCheck {
        actor_id: EntityId,
        skill: String,
        difficulty: f64,
    },
    UseItem {
        actor_id: EntityId,
        item_id: ItemId,
    },
    Interact {
        actor_id: EntityId,
        target_id: EntityId,
        interaction: String,
    },
}

impl Action {
    pub fn move_to(actor_id: EntityId, position: Position) -> Self {
        Self::Move {
            actor_id,
            target: position.into(),
        }
    }

    pub fn attack(actor_id: EntityId, target_id: EntityId) -> Self {
        Self::Attack {
            actor_id,
            target_id,
        }
    }

    pub fn actor_id(&self) -> &EntityId {
        match self {
            Self::Move { actor_id, .. }
            | Self::Attack { actor_id, .. }
            | Self::SkillCheck { actor_id, .. }
            | Self::UseItem { actor_id, .. }
            | Self::Interact { actor_id, .. } => actor_id,
        }
    }

    /// Whether every numeric field is finite, i.e. representable in JSON
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Move { target, .. } => target.x.is_finite() && target.y.is_finite(),
            Self::SkillCheck { difficulty, .. } => difficulty.is_finite(),
            Self::Attack { .. } | Self::UseItem { .. } | Self::Interact { .. } => true,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Attack { .. } => "attack",
            Self::SkillCheck { .. } => "skill_check",
            Self::UseItem { .. } => "use_item",
            Self::Interact { .. } => "interact",
        }
    }
}
