//! Turn Engine - Orchestrates a single run from initialization to a result
//!
//! The engine is stateless between runs. `initialize` builds a `RunSession`
//! that owns all run state; `execute_turn` advances it one turn;
//! `simulate_run` composes both with the provider lifecycle hooks.
//!
//! # Ordering
//!
//! Every random draw goes through the session's seeded generator in a fixed
//! order: monster spawn points (rooms in map order, enemies in room order),
//! then initiative, then per-action rolls in initiative order, turn after
//! turn. Providers are awaited one at a time so this order never depends on
//! scheduling.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::action_executor::{execute_action, reject};
use super::engine_state::{DungeonState, EngineState, RunPhase};
use crate::application::dto::{RunInput, RunOutput, RunResult, Turn};
use crate::application::ports::outbound::{
    ActionProvider, DecisionContext, MapRepositoryPort, WorldSnapshot,
};
use crate::domain::entities::DungeonMap;
use crate::domain::events::GameEvent;
use crate::domain::services::{
    are_all_objectives_complete, engage_nearest_opponent, find_room_for_position,
    generate_seed, is_party_wiped, roll_initiative, Dice,
};
use crate::domain::value_objects::{Action, EntityId, MapId, Position};

/// Misuse of the engine; game-world failures are events, never errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    #[error("Map not found: {0}")]
    MapNotFound(MapId),

    #[error("Run {run_id} is not running (phase: {phase:?})")]
    NotRunning { run_id: String, phase: RunPhase },

    #[error("Entity {entity_id} cannot fight: {reason}")]
    InvalidWeapon { entity_id: EntityId, reason: String },

    #[error("Start time {0} ms is outside the representable range")]
    InvalidStartTime(i64),
}

/// Engine-side tunables
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Turn limit when the input does not name one
    pub default_max_turns: u32,
    /// Upper bound on a single provider call
    pub provider_timeout: Duration,
    /// How many recent events a provider sees
    pub recent_event_window: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_max_turns: 100,
            provider_timeout: Duration::from_millis(5_000),
            recent_event_window: 10,
        }
    }
}

/// Decision sources known to the engine
///
/// Player entities are looked up by the agent id bound to them in the run
/// input; every non-player entity goes to the dungeon master. An entity with
/// no provider uses the default tactics.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    agents: HashMap<String, Arc<dyn ActionProvider>>,
    dungeon_master: Option<Arc<dyn ActionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>, provider: Arc<dyn ActionProvider>) -> Self {
        self.agents.insert(agent_id.into(), provider);
        self
    }

    pub fn with_dungeon_master(mut self, provider: Arc<dyn ActionProvider>) -> Self {
        self.dungeon_master = Some(provider);
        self
    }

    pub fn agent(&self, agent_id: &str) -> Option<&Arc<dyn ActionProvider>> {
        self.agents.get(agent_id)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut agents: Vec<&String> = self.agents.keys().collect();
        agents.sort();
        f.debug_struct("ProviderRegistry")
            .field("agents", &agents)
            .field("dungeon_master", &self.dungeon_master.is_some())
            .finish()
    }
}

/// A run in progress
#[derive(Debug)]
pub struct RunSession {
    pub state: EngineState,
    pub turns: Vec<Turn>,
    /// Player entity id to the agent id driving it
    bindings: HashMap<EntityId, String>,
    max_turns: u32,
}

impl RunSession {
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn agent_for(&self, entity_id: &EntityId) -> Option<&str> {
        self.bindings.get(entity_id).map(String::as_str)
    }

    /// Agent ids bound to players, in player order, without repeats
    fn bound_agents(&self) -> Vec<String> {
        let mut agents: Vec<String> = Vec::new();
        for player in self.state.entities.players() {
            if let Some(agent_id) = self.bindings.get(&player.id) {
                if !agents.contains(agent_id) {
                    agents.push(agent_id.clone());
                }
            }
        }
        agents
    }

    fn into_output(self, result: RunResult) -> RunOutput {
        RunOutput {
            events: self.state.events.clone(),
            final_state: self.state,
            turns: self.turns,
            result,
        }
    }
}

pub struct TurnEngine {
    maps: Arc<dyn MapRepositoryPort>,
    providers: ProviderRegistry,
    settings: EngineSettings,
}

impl TurnEngine {
    pub fn new(maps: Arc<dyn MapRepositoryPort>, providers: ProviderRegistry) -> Self {
        Self {
            maps,
            providers,
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Build the run state: seed, entities, map placement and initiative
    #[instrument(skip(self, input), fields(run_id = %input.run_id))]
    pub fn initialize(&self, input: RunInput) -> Result<RunSession, EngineError> {
        if DateTime::<Utc>::from_timestamp_millis(input.start_time).is_none() {
            return Err(EngineError::InvalidStartTime(input.start_time));
        }
        for entity in &input.entities {
            if let Some(reason) = entity.weapon.as_ref().and_then(|weapon| weapon.problem()) {
                return Err(EngineError::InvalidWeapon {
                    entity_id: entity.id.clone(),
                    reason,
                });
            }
        }

        let seed = generate_seed(&input.dungeon_seed, &input.run_id, input.start_time);
        let mut state = EngineState::new(input.run_id.clone(), seed, input.start_time);

        let map = match &input.map_id {
            Some(map_id) => Some(
                self.maps
                    .load_map(map_id)
                    .ok_or_else(|| EngineError::MapNotFound(map_id.clone()))?,
            ),
            None => None,
        };

        for entity in input.entities {
            state.entities.insert(entity)?;
        }
        if let Some(map) = map {
            populate_dungeon(&mut state, map)?;
        }

        state.initiative = roll_initiative(&state.entities, &mut state.rng);

        let bindings: HashMap<EntityId, String> = state
            .entities
            .players()
            .map(|player| player.id.clone())
            .zip(input.agent_ids)
            .collect();

        state.phase = RunPhase::Running;
        let max_turns = input.max_turns.unwrap_or(self.settings.default_max_turns);
        info!(
            seed = %state.seed,
            entities = state.entities.len(),
            max_turns,
            "Run initialized"
        );

        Ok(RunSession {
            state,
            turns: Vec::new(),
            bindings,
            max_turns,
        })
    }

    /// Play one turn; returns the result once the run has ended
    #[instrument(skip(self, session), fields(run_id = %session.state.run_id, turn = session.state.turn + 1))]
    pub async fn execute_turn(&self, session: &mut RunSession) -> Result<Option<RunResult>, EngineError> {
        if session.state.phase != RunPhase::Running {
            return Err(EngineError::NotRunning {
                run_id: session.state.run_id.clone(),
                phase: session.state.phase,
            });
        }
        if session.state.turn >= session.max_turns {
            return Ok(Some(finish(&mut session.state, RunResult::Timeout)));
        }

        session.state.turn += 1;
        let turn_number = session.state.turn;
        let order = session.state.initiative.clone();
        let mut actions = Vec::new();
        let mut pending: Vec<GameEvent> = Vec::new();

        for (slot, entry) in order.iter().enumerate() {
            let alive = session
                .state
                .entity(&entry.entity_id)
                .is_some_and(|entity| entity.is_alive());
            if !alive {
                continue;
            }

            let timestamp = session.state.clock.timestamp(turn_number, slot);
            let action = match self.request_action(session, &entry.entity_id, &pending).await {
                Some(action) => Some(action),
                None => default_action(&session.state, &entry.entity_id),
            };
            let Some(action) = action else {
                debug!(entity_id = %entry.entity_id, "No action available, skipping");
                continue;
            };

            let produced = if action.actor_id() != &entry.entity_id {
                let error = format!(
                    "Action for {} submitted on behalf of {}",
                    action.actor_id(),
                    entry.entity_id
                );
                vec![reject(&mut session.state, &action, vec![error], timestamp)]
            } else {
                execute_action(&mut session.state, &action, timestamp)
            };
            // JSON has no NaN or infinity; the rejection event is the record
            if action.is_finite() {
                actions.push(action);
            }
            pending.extend(produced);
        }

        session.state.events.extend(pending.iter().cloned());
        session.turns.push(Turn {
            number: turn_number,
            initiative: session.state.initiative.clone(),
            actions,
            events: pending,
        });

        let outcome = evaluate_termination(&session.state).or_else(|| {
            (turn_number >= session.max_turns).then_some(RunResult::Timeout)
        });
        Ok(outcome.map(|result| finish(&mut session.state, result)))
    }

    /// Cancel a run from outside the turn loop
    pub fn abandon(&self, session: &mut RunSession) -> Result<RunResult, EngineError> {
        if session.state.phase.is_terminal() {
            return Err(EngineError::NotRunning {
                run_id: session.state.run_id.clone(),
                phase: session.state.phase,
            });
        }
        Ok(finish(&mut session.state, RunResult::Abandoned))
    }

    /// Run from initialization to a terminal result
    #[instrument(skip(self, input), fields(run_id = %input.run_id))]
    pub async fn simulate_run(&self, input: RunInput) -> Result<RunOutput, EngineError> {
        let mut session = self.initialize(input)?;
        let run_id = session.state.run_id.clone();

        let agents: Vec<Arc<dyn ActionProvider>> = session
            .bound_agents()
            .iter()
            .filter_map(|agent_id| self.providers.agent(agent_id).cloned())
            .collect();

        for agent in &agents {
            if tokio::time::timeout(self.settings.provider_timeout, agent.on_run_start(&run_id))
                .await
                .is_err()
            {
                warn!(run_id = %run_id, "Run start hook timed out");
            }
        }

        let result = loop {
            if let Some(result) = self.execute_turn(&mut session).await? {
                break result;
            }
        };

        for agent in &agents {
            if tokio::time::timeout(self.settings.provider_timeout, agent.on_run_end(&run_id, result))
                .await
                .is_err()
            {
                warn!(run_id = %run_id, "Run end hook timed out");
            }
        }

        Ok(session.into_output(result))
    }

    fn provider_for(&self, session: &RunSession, entity_id: &EntityId) -> Option<&Arc<dyn ActionProvider>> {
        let entity = session.state.entity(entity_id)?;
        if entity.is_player {
            session
                .agent_for(entity_id)
                .and_then(|agent_id| self.providers.agent(agent_id))
        } else {
            self.providers.dungeon_master.as_ref()
        }
    }

    /// Ask the entity's provider for an action; errors and timeouts are `None`
    async fn request_action(
        &self,
        session: &RunSession,
        entity_id: &EntityId,
        pending: &[GameEvent],
    ) -> Option<Action> {
        let provider = self.provider_for(session, entity_id)?;
        let context = self.decision_context(&session.state, entity_id, pending);

        match tokio::time::timeout(self.settings.provider_timeout, provider.decide(&context)).await {
            Ok(Ok(action)) => action,
            Ok(Err(e)) => {
                warn!(entity_id = %entity_id, error = %e, "Action provider failed");
                None
            }
            Err(_) => {
                warn!(
                    entity_id = %entity_id,
                    timeout_ms = self.settings.provider_timeout.as_millis() as u64,
                    "Action provider timed out"
                );
                None
            }
        }
    }

    fn decision_context(&self, state: &EngineState, entity_id: &EntityId, pending: &[GameEvent]) -> DecisionContext {
        let window = self.settings.recent_event_window;
        let mut recent: Vec<GameEvent> = state.events.iter().chain(pending).cloned().collect();
        if recent.len() > window {
            recent.drain(..recent.len() - window);
        }

        DecisionContext {
            run_id: state.run_id.clone(),
            turn_number: state.turn,
            entity_id: entity_id.clone(),
            recent_events: recent,
            world_state: WorldSnapshot {
                entities: state.entities.to_vec(),
                map: state.map().cloned(),
                discovered_rooms: state
                    .dungeon
                    .as_ref()
                    .map(|dungeon| dungeon.discovered.iter().cloned().collect())
                    .unwrap_or_default(),
            },
        }
    }
}

/// Place players at the entry room, spawn monsters and index occupancy
fn populate_dungeon(state: &mut EngineState, map: Arc<DungeonMap>) -> Result<(), EngineError> {
    state.dungeon = Some(DungeonState::new(Arc::clone(&map)));

    if let Some(entry) = map.entry_room() {
        let players: Vec<EntityId> = state.entities.players().map(|p| p.id.clone()).collect();
        if !entry.spawn_points.is_empty() {
            for (i, player_id) in players.iter().enumerate() {
                let position = entry.spawn_points[i % entry.spawn_points.len()];
                state.place(player_id, position, Some(entry.id.clone()));
            }
        }
        state.discover(&entry.id);
    }

    // Everyone not placed above keeps a supplied position, with the room
    // resolved from it; without a position there is no room either
    let unplaced: Vec<(EntityId, Option<Position>)> = state
        .entities
        .iter()
        .filter(|entity| {
            state
                .dungeon
                .as_ref()
                .is_some_and(|dungeon| !dungeon.entities.contains_key(&entity.id))
        })
        .map(|entity| (entity.id.clone(), entity.position))
        .collect();
    for (entity_id, position) in unplaced {
        match position {
            Some(position) => {
                let room_id = find_room_for_position(&position, &map).map(|room| room.id.clone());
                state.place(&entity_id, position, room_id);
            }
            None => {
                if let Some(entity) = state.entities.get_mut(&entity_id) {
                    entity.room_id = None;
                }
            }
        }
    }

    for room in &map.rooms {
        for enemy in &room.enemies {
            let position = if room.spawn_points.is_empty() {
                room.center()
            } else {
                room.spawn_points[state.rng.pick_index(room.spawn_points.len())]
            };
            let monster = enemy.spawn(room, position);
            let monster_id = monster.id.clone();
            state.entities.insert(monster)?;
            state.place(&monster_id, position, Some(room.id.clone()));
            debug!(entity_id = %monster_id, room_id = %room.id, %position, "Monster spawned");
        }
    }
    Ok(())
}

/// Step toward, or strike, the nearest opponent in the same room
fn default_action(state: &EngineState, entity_id: &EntityId) -> Option<Action> {
    let actor = state.entity(entity_id)?;
    engage_nearest_opponent(actor, &state.entities)
}

/// Victory, then party wipe, then total wipe
fn evaluate_termination(state: &EngineState) -> Option<RunResult> {
    if let Some(map) = state.map() {
        if !map.objectives.is_empty()
            && are_all_objectives_complete(&map.objectives, &state.entities, &state.events)
        {
            return Some(RunResult::Victory);
        }
    }
    if is_party_wiped(&state.entities) {
        return Some(RunResult::Defeat);
    }
    if state.entities.living().next().is_none() {
        return Some(RunResult::Defeat);
    }
    None
}

fn finish(state: &mut EngineState, result: RunResult) -> RunResult {
    state.phase = RunPhase::from(result);
    info!(
        run_id = %state.run_id,
        turn = state.turn,
        events = state.events.len(),
        result = %result,
        "Run finished"
    );
    result
}
