//! Game events - the append-only facts a run emits
//!
//! Events are the only durable output of a run. The replay UI rebuilds the
//! whole fight from them, so every variant carries enough data to be rendered
//! without access to engine state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{EntityId, EventId, ItemId, Position, RoomId};

/// A single emitted fact with its identity and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: GameEventKind,
}

impl GameEvent {
    /// Whether this event records the death of `entity_id`
    pub fn is_death_of(&self, entity_id: &EntityId) -> bool {
        matches!(
            &self.kind,
            GameEventKind::Combat(CombatEvent::Death { entity_id: dead, .. }) if dead == entity_id
        )
    }

    pub fn is_system(&self) -> bool {
        matches!(self.kind, GameEventKind::System(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GameEventKind {
    Combat(CombatEvent),
    Exploration(ExplorationEvent),
    Interaction(InteractionEvent),
    System(SystemEvent),
    /// Reserved for dungeon-master generated text
    Narrative(NarrativeEvent),
}

impl From<CombatEvent> for GameEventKind {
    fn from(event: CombatEvent) -> Self {
        Self::Combat(event)
    }
}

impl From<ExplorationEvent> for GameEventKind {
    fn from(event: ExplorationEvent) -> Self {
        Self::Exploration(event)
    }
}

impl From<InteractionEvent> for GameEventKind {
    fn from(event: InteractionEvent) -> Self {
        Self::Interaction(event)
    }
}

impl From<SystemEvent> for GameEventKind {
    fn from(event: SystemEvent) -> Self {
        Self::System(event)
    }
}

impl From<NarrativeEvent> for GameEventKind {
    fn from(event: NarrativeEvent) -> Self {
        Self::Narrative(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CombatEvent {
    Attack {
        attacker_id: EntityId,
        target_id: EntityId,
        weapon: Option<String>,
        natural_roll: u32,
        roll: i32,
        hit: bool,
        critical: bool,
        damage: i32,
        target_hp: i32,
    },
    Death {
        entity_id: EntityId,
        killed_by: EntityId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ExplorationEvent {
    Move {
        entity_id: EntityId,
        from: Option<Position>,
        to: Position,
    },
    EnterRoom {
        entity_id: EntityId,
        room_id: RoomId,
    },
    ExitRoom {
        entity_id: EntityId,
        room_id: RoomId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum InteractionEvent {
    SkillCheck {
        actor_id: EntityId,
        skill: String,
        natural_roll: u32,
        modifier: i32,
        total: i32,
        difficulty: f64,
        success: bool,
    },
    Interact {
        actor_id: EntityId,
        target_id: EntityId,
        interaction: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SystemEvent {
    /// An action failed validation or a game rule and was not executed
    ActionRejected {
        actor_id: EntityId,
        action_type: String,
        errors: Vec<String>,
    },
    ItemUsed {
        actor_id: EntityId,
        item_id: ItemId,
        healed: Option<i32>,
    },
    ItemPickedUp {
        actor_id: EntityId,
        item_id: ItemId,
        room_id: RoomId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeEvent {
    pub text: String,
    pub speaker: Option<String>,
}
