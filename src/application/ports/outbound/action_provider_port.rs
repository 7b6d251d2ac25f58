//! Action provider port - Interface for whatever decides an entity's action
//!
//! Player agents (LLM-backed or scripted) and the dungeon master controller
//! all sit behind this trait. The engine awaits one provider call at a time,
//! under a timeout, and treats errors and timeouts as "no action".

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::application::dto::RunResult;
use crate::domain::entities::{DungeonMap, Entity};
use crate::domain::events::GameEvent;
use crate::domain::value_objects::{Action, EntityId, RoomId};

/// Read-only view of the run handed to a provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub entities: Vec<Entity>,
    pub map: Option<Arc<DungeonMap>>,
    pub discovered_rooms: Vec<RoomId>,
}

impl WorldSnapshot {
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| &entity.id == id)
    }

    pub fn is_discovered(&self, room_id: &RoomId) -> bool {
        self.discovered_rooms.contains(room_id)
    }
}

/// Everything a provider gets to decide one entity's action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionContext {
    pub run_id: String,
    pub turn_number: u32,
    /// The entity the provider is deciding for
    pub entity_id: EntityId,
    /// The most recent events, oldest first
    pub recent_events: Vec<GameEvent>,
    pub world_state: WorldSnapshot,
}

impl DecisionContext {
    /// The acting entity as it stands right now
    pub fn actor(&self) -> Option<&Entity> {
        self.world_state.entity(&self.entity_id)
    }
}

/// Port for a decision source
///
/// # Examples
///
/// ```ignore
/// struct Idle;
///
/// #[async_trait]
/// impl ActionProvider for Idle {
///     async fn decide(&self, _context: &DecisionContext) -> anyhow::Result<Option<Action>> {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Decide the action for `context.entity_id`, or `None` to use the default
    async fn decide(&self, context: &DecisionContext) -> anyhow::Result<Option<Action>>;

    /// Called once before the first turn
    async fn on_run_start(&self, _run_id: &str) {}

    /// Called once after the run reached a terminal result
    async fn on_run_end(&self, _run_id: &str, _result: RunResult) {}
}
