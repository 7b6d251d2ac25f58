//! Dungeon master controller for non-player entities

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::outbound::{ActionProvider, DecisionContext};
use crate::domain::services::adjacent_opponent;
use crate::domain::value_objects::Action;

/// Attacks an adjacent opponent, otherwise leaves the monster to the
/// engine's default tactics
#[derive(Debug, Clone, Copy, Default)]
pub struct DungeonMasterProvider;

impl DungeonMasterProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionProvider for DungeonMasterProvider {
    async fn decide(&self, context: &DecisionContext) -> anyhow::Result<Option<Action>> {
        let Some(actor) = context.actor() else {
            return Ok(None);
        };
        let action = adjacent_opponent(actor, &context.world_state.entities)
            .map(|target| Action::attack(actor.id.clone(), target.id.clone()));
        if let Some(action) = &action {
            debug!(entity_id = %actor.id, action = action.kind(), "Dungeon master decided");
        }
        Ok(action)
    }
}
