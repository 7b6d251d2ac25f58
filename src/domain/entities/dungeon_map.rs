//! Dungeon map - the immutable room graph a run is played on
//!
//! Maps are static data files. A run loads one at initialization and never
//! mutates it; live occupancy is tracked separately in the engine's
//! `DungeonState`.

use serde::{Deserialize, Serialize};

use super::{CombatStats, Entity, Weapon};
use crate::domain::value_objects::{AbilityScores, EntityId, ItemId, MapId, Position, RoomId};

/// A complete dungeon definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonMap {
    pub id: MapId,
    pub name: String,
    pub seed: String,
    #[serde(default)]
    pub description: String,
    pub width: i32,
    pub height: i32,
    pub rooms: Vec<Room>,
    pub objectives: Vec<DungeonObjective>,
}

impl DungeonMap {
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.id == id)
    }

    /// The room players start in: the first entrance room, else the first room
    pub fn entry_room(&self) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|room| room.room_type == RoomType::Entrance)
            .or_else(|| self.rooms.first())
    }
}

/// A rectangular room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    pub bounds: RoomBounds,
    #[serde(default)]
    pub room_type: RoomType,
    /// Rooms reachable from this one; the relation is symmetric
    #[serde(default)]
    pub connections: Vec<RoomId>,
    #[serde(default)]
    pub spawn_points: Vec<Position>,
    /// Items lying in the room at the start of a run
    #[serde(default)]
    pub items: Vec<ItemId>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

impl Room {
    pub fn is_connected_to(&self, other: &RoomId) -> bool {
        self.connections.contains(other)
    }

    /// Center tile, used as a walking target
    pub fn center(&self) -> Position {
        Position::new(
            self.bounds.x + self.bounds.width / 2,
            self.bounds.y + self.bounds.height / 2,
        )
    }
}

/// Half-open rectangle: `[x, x + width) x [y, y + height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoomBounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Entrance,
    #[default]
    Normal,
    Corridor,
    Treasure,
    Boss,
}

/// A monster placed in a room when a run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySpawn {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub abilities: AbilityScores,
    pub stats: CombatStats,
    #[serde(default)]
    pub weapon: Option<Weapon>,
    #[serde(default)]
    pub inventory: Vec<ItemId>,
}

impl EnemySpawn {
    /// Build the monster entity standing at `position` in `room`
    pub fn spawn(&self, room: &Room, position: Position) -> Entity {
        Entity {
            id: self.id.clone(),
            name: self.name.clone(),
            abilities: self.abilities,
            stats: self.stats,
            position: Some(position),
            room_id: Some(room.id.clone()),
            is_player: false,
            inventory: self.inventory.clone(),
            weapon: self.weapon.clone(),
        }
    }
}

/// A win condition attached to a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DungeonObjective {
    DefeatBoss { target_id: EntityId },
    RetrieveItem { target_id: ItemId },
    ClearRoom { target_id: EntityId },
    Survive,
}

impl DungeonObjective {
    pub fn description(&self) -> String {
        match self {
            Self::DefeatBoss { target_id } => format!("Defeat {}", target_id),
            Self::RetrieveItem { target_id } => format!("Retrieve {}", target_id),
            Self::ClearRoom { target_id } => format!("Clear the room held by {}", target_id),
            Self::Survive => "Survive".to_string(),
        }
    }
}
