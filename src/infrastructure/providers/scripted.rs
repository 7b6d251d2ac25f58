//! Scripted provider - replays fixed actions, for tests and replays

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::dto::{RunResult, Turn};
use crate::application::ports::outbound::{ActionProvider, DecisionContext};
use crate::domain::value_objects::{Action, EntityId};

/// Returns the scripted action for `(turn, entity)`, or nothing
///
/// Records the results reported through the run-end hook.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: HashMap<(u32, EntityId), Action>,
    results: RwLock<Vec<(String, RunResult)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` for its actor on turn `turn`
    pub fn with_action(mut self, turn: u32, action: Action) -> Self {
        self.script.insert((turn, action.actor_id().clone()), action);
        self
    }

    /// Script built from recorded turns, replaying every action as taken
    pub fn from_turns(turns: &[Turn]) -> Self {
        turns.iter().fold(Self::new(), |provider, turn| {
            turn.actions
                .iter()
                .fold(provider, |provider, action| provider.with_action(turn.number, action.clone()))
        })
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// `(run_id, result)` for every run this provider saw finish
    pub async fn results(&self) -> Vec<(String, RunResult)> {
        self.results.read().await.clone()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn decide(&self, context: &DecisionContext) -> anyhow::Result<Option<Action>> {
        Ok(self
            .script
            .get(&(context.turn_number, context.entity_id.clone()))
            .cloned())
    }

    async fn on_run_end(&self, run_id: &str, result: RunResult) {
        self.results.write().await.push((run_id.to_string(), result));
    }
}
