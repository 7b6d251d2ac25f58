//! Run DTOs - what a caller hands the engine and what it gets back

use serde::{Deserialize, Serialize};

use crate::application::services::EngineState;
use crate::domain::entities::Entity;
use crate::domain::events::GameEvent;
use crate::domain::services::InitiativeEntry;
use crate::domain::value_objects::{Action, MapId};

/// Everything needed to start a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInput {
    pub dungeon_seed: String,
    pub run_id: String,
    /// Milliseconds since the Unix epoch
    pub start_time: i64,
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub map_id: Option<MapId>,
    /// `agent_ids[i]` drives the i-th player entity, in input order
    #[serde(default)]
    pub agent_ids: Vec<String>,
}

impl RunInput {
    pub fn new(
        dungeon_seed: impl Into<String>,
        run_id: impl Into<String>,
        start_time: i64,
        entities: Vec<Entity>,
    ) -> Self {
        Self {
            dungeon_seed: dungeon_seed.into(),
            run_id: run_id.into(),
            start_time,
            entities,
            max_turns: None,
            map_id: None,
            agent_ids: Vec::new(),
        }
    }

    pub fn with_map(mut self, map_id: impl Into<MapId>) -> Self {
        self.map_id = Some(map_id.into());
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_ids.push(agent_id.into());
        self
    }
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    Victory,
    Defeat,
    Timeout,
    /// Cancelled by the caller; never produced by the turn loop itself
    Abandoned,
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Timeout => "timeout",
            Self::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// Record of one completed turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub number: u32,
    pub initiative: Vec<InitiativeEntry>,
    /// Actions as submitted, minus any carrying NaN or infinite numbers;
    /// those show up only as their rejection event
    pub actions: Vec<Action>,
    pub events: Vec<GameEvent>,
}

/// The complete result handed to persistence and replay
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub events: Vec<GameEvent>,
    pub final_state: EngineState,
    pub turns: Vec<Turn>,
    pub result: RunResult,
}
