//! Domain entities - Combatants and the dungeon they fight in

mod dungeon_map;
mod entity;

pub use dungeon_map::{DungeonMap, DungeonObjective, EnemySpawn, Room, RoomBounds, RoomType};
pub use entity::{CombatStats, Entity, Weapon};
