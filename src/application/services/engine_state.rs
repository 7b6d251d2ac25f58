//! Engine state - the mutable aggregate owned by a single run
//!
//! `EngineState` is created when a run is initialized and dropped (or handed
//! to a persistence collaborator) when it ends. Nothing in it is shared
//! between runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::warn;
use uuid::Uuid;

use super::turn_engine::EngineError;
use crate::application::dto::RunResult;
use crate::domain::entities::{DungeonMap, Entity};
use crate::domain::events::{GameEvent, GameEventKind};
use crate::domain::services::{EntityLookup, GameRng, InitiativeEntry, RunSeed};
use crate::domain::value_objects::{EntityId, EventId, ItemId, Position, RoomId};

/// Length of one round of play on the event clock
const ROUND_MILLIS: i64 = 6_000;

/// Id-indexed entity arena that remembers insertion order
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl EntityTable {
    pub fn insert(&mut self, entity: Entity) -> Result<(), EngineError> {
        if self.index.contains_key(&entity.id) {
            return Err(EngineError::DuplicateEntity(entity.id));
        }
        self.index.insert(entity.id.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&slot| &self.entities[slot])
    }

    pub(crate) fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        match self.index.get(id) {
            Some(&slot) => Some(&mut self.entities[slot]),
            None => None,
        }
    }

    /// Write back an updated copy of an existing entity
    pub fn replace(&mut self, entity: Entity) -> Option<Entity> {
        let slot = *self.index.get(&entity.id)?;
        Some(std::mem::replace(&mut self.entities[slot], entity))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_alive())
    }

    pub fn players(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_player)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Entity> {
        self.entities.clone()
    }
}

impl<'a> IntoIterator for &'a EntityTable {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl EntityLookup for EntityTable {
    fn contains_entity(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }
}

impl Serialize for EntityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entities)
    }
}

/// Where an entity currently stands on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupancy {
    pub room_id: RoomId,
    pub position: Position,
}

/// Live occupancy index over the run's static map
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonState {
    pub map: Arc<DungeonMap>,
    pub entities: BTreeMap<EntityId, Occupancy>,
    pub discovered: BTreeSet<RoomId>,
    /// Items still lying in each room
    pub room_items: BTreeMap<RoomId, Vec<ItemId>>,
}

impl DungeonState {
    pub fn new(map: Arc<DungeonMap>) -> Self {
        let room_items = map
            .rooms
            .iter()
            .filter(|room| !room.items.is_empty())
            .map(|room| (room.id.clone(), room.items.clone()))
            .collect();
        Self {
            map,
            entities: BTreeMap::new(),
            discovered: BTreeSet::new(),
            room_items,
        }
    }

    /// Remove and return every item left in `room_id`
    pub fn take_room_items(&mut self, room_id: &RoomId) -> Vec<ItemId> {
        self.room_items.remove(room_id).unwrap_or_default()
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Initializing,
    Running,
    Victory,
    Defeat,
    Timeout,
    Abandoned,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Initializing | Self::Running)
    }

    pub fn result(&self) -> Option<RunResult> {
        match self {
            Self::Victory => Some(RunResult::Victory),
            Self::Defeat => Some(RunResult::Defeat),
            Self::Timeout => Some(RunResult::Timeout),
            Self::Abandoned => Some(RunResult::Abandoned),
            Self::Initializing | Self::Running => None,
        }
    }
}

impl From<RunResult> for RunPhase {
    fn from(result: RunResult) -> Self {
        match result {
            RunResult::Victory => Self::Victory,
            RunResult::Defeat => Self::Defeat,
            RunResult::Timeout => Self::Timeout,
            RunResult::Abandoned => Self::Abandoned,
        }
    }
}

/// Deterministic event identity and timestamps
///
/// Ids are uuid v5 values in a namespace derived from the run seed; time is
/// the run's start time advanced one round per turn and one millisecond per
/// acting slot, so replays never depend on the wall clock.
#[derive(Debug, Clone)]
pub struct EventClock {
    namespace: Uuid,
    start_time: i64,
    sequence: u64,
}

impl EventClock {
    pub fn new(seed: &RunSeed, start_time: i64) -> Self {
        Self {
            namespace: Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()),
            start_time,
            sequence: 0,
        }
    }

    /// Timestamp for the `slot`-th actor of turn `turn` (turns start at 1)
    pub fn timestamp(&self, turn: u32, slot: usize) -> DateTime<Utc> {
        let elapsed = i64::from(turn.saturating_sub(1)) * ROUND_MILLIS + slot as i64;
        let millis = self.start_time.saturating_add(elapsed);
        DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(|| {
            warn!(millis, "Event time out of range, using the epoch");
            DateTime::<Utc>::default()
        })
    }

    pub fn emit(&mut self, timestamp: DateTime<Utc>, kind: impl Into<GameEventKind>) -> GameEvent {
        let id = EventId::derive(&self.namespace, self.sequence);
        self.sequence += 1;
        GameEvent {
            id,
            timestamp,
            kind: kind.into(),
        }
    }
}

/// The run's mutable aggregate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub run_id: String,
    pub seed: RunSeed,
    pub phase: RunPhase,
    pub entities: EntityTable,
    /// Fixed once rolled; never re-rolled mid-run
    pub initiative: Vec<InitiativeEntry>,
    pub turn: u32,
    pub events: Vec<GameEvent>,
    pub dungeon: Option<DungeonState>,
    #[serde(skip)]
    pub(crate) rng: GameRng,
    #[serde(skip)]
    pub(crate) clock: EventClock,
}

impl EngineState {
    pub(crate) fn new(run_id: String, seed: RunSeed, start_time: i64) -> Self {
        Self {
            run_id,
            seed,
            phase: RunPhase::Initializing,
            entities: EntityTable::default(),
            initiative: Vec::new(),
            turn: 0,
            events: Vec::new(),
            dungeon: None,
            rng: GameRng::new(seed),
            clock: EventClock::new(&seed, start_time),
        }
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn map(&self) -> Option<&Arc<DungeonMap>> {
        self.dungeon.as_ref().map(|dungeon| &dungeon.map)
    }

    /// Move an entity, keeping its own fields and the occupancy index in step
    pub(crate) fn place(&mut self, id: &EntityId, position: Position, room_id: Option<RoomId>) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.position = Some(position);
        entity.room_id = room_id.clone();

        if let Some(dungeon) = self.dungeon.as_mut() {
            match room_id {
                Some(room_id) => {
                    dungeon
                        .entities
                        .insert(id.clone(), Occupancy { room_id, position });
                }
                None => {
                    dungeon.entities.remove(id);
                }
            }
        }
    }

    pub(crate) fn discover(&mut self, room_id: &RoomId) -> bool {
        match self.dungeon.as_mut() {
            Some(dungeon) => dungeon.discovered.insert(room_id.clone()),
            None => false,
        }
    }
}
