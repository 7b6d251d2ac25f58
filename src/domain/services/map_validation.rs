//! Structural map validation
//!
//! Collects every problem as a readable message instead of stopping at the
//! first one, so a map author gets the full report in one pass.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::spatial::is_position_in_room;
use crate::domain::entities::{DungeonMap, DungeonObjective, Weapon};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub fn validate_map(map: &DungeonMap) -> MapValidation {
    let mut errors = Vec::new();

    if map.id.is_empty() {
        errors.push("Map id is required".to_string());
    }
    if map.name.trim().is_empty() {
        errors.push("Map name is required".to_string());
    }
    if map.seed.trim().is_empty() {
        errors.push("Map seed is required".to_string());
    }
    if map.rooms.is_empty() {
        errors.push("Map must contain at least one room".to_string());
    }
    if map.objectives.is_empty() {
        errors.push("Map must define at least one objective".to_string());
    }

    let mut room_ids = HashSet::new();
    for room in &map.rooms {
        if !room_ids.insert(&room.id) {
            errors.push(format!("Duplicate room id: {}", room.id));
        }
    }

    let mut enemy_ids = HashSet::new();
    for room in &map.rooms {
        let bounds = &room.bounds;
        if bounds.width <= 0 || bounds.height <= 0 {
            errors.push(format!("Room {} must have a positive width and height", room.id));
        }
        if bounds.x < 0
            || bounds.y < 0
            || bounds.x + bounds.width > map.width
            || bounds.y + bounds.height > map.height
        {
            errors.push(format!("Room {} extends outside the map bounds", room.id));
        }

        if room.spawn_points.is_empty() {
            errors.push(format!("Room {} has no spawn points", room.id));
        }
        for point in &room.spawn_points {
            if !is_position_in_room(point, room) {
                errors.push(format!("Room {} has spawn point {} outside its bounds", room.id, point));
            }
        }

        for connection in &room.connections {
            match map.room(connection) {
                None => errors.push(format!(
                    "Room {} connects to unknown room {}",
                    room.id, connection
                )),
                Some(other) if !other.is_connected_to(&room.id) => errors.push(format!(
                    "Room {} connects to {} but {} does not connect back",
                    room.id, connection, connection
                )),
                Some(_) => {}
            }
        }

        for enemy in &room.enemies {
            if !enemy_ids.insert(&enemy.id) {
                errors.push(format!("Duplicate enemy id: {}", enemy.id));
            }
            if let Some(problem) = enemy.weapon.as_ref().and_then(Weapon::problem) {
                errors.push(format!("Enemy {}: {}", enemy.id, problem));
            }
        }
    }

    for objective in &map.objectives {
        match objective {
            DungeonObjective::DefeatBoss { target_id } | DungeonObjective::ClearRoom { target_id } => {
                if !enemy_ids.contains(target_id) {
                    errors.push(format!(
                        "Objective '{}' targets unknown enemy {}",
                        objective.description(),
                        target_id
                    ));
                }
            }
            DungeonObjective::RetrieveItem { target_id } => {
                if !map.rooms.iter().any(|room| room.items.contains(target_id)) {
                    errors.push(format!(
                        "Objective '{}' targets item {} that no room contains",
                        objective.description(),
                        target_id
                    ));
                }
            }
            DungeonObjective::Survive => {}
        }
    }

    MapValidation {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CombatStats, EnemySpawn, Room, RoomBounds, RoomType, Weapon};
    use crate::domain::value_objects::{AbilityScores, EntityId, ItemId, MapId, Position, RoomId};

    fn room(id: &str, x: i32, connections: &[&str]) -> Room {
        Room {
            id: RoomId::new(id),
            name: id.to_string(),
            bounds: RoomBounds::new(x, 0, 4, 4),
            room_type: RoomType::Normal,
            connections: connections.iter().map(|c| RoomId::new(*c)).collect(),
            spawn_points: vec![Position::new(x + 1, 1)],
            items: vec![],
            enemies: vec![],
        }
    }

    fn map(rooms: Vec<Room>, objectives: Vec<DungeonObjective>) -> DungeonMap {
        DungeonMap {
            id: MapId::new("test"),
            name: "Test".to_string(),
            seed: "seed".to_string(),
            description: String::new(),
            width: 20,
            height: 10,
            rooms,
            objectives,
        }
    }

    #[test]
    fn test_valid_map() {
        let result = validate_map(&map(
            vec![room("a", 0, &["b"]), room("b", 4, &["a"])],
            vec![DungeonObjective::Survive],
        ));
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_asymmetric_connection_is_reported() {
        let result = validate_map(&map(
            vec![room("a", 0, &["b"]), room("b", 4, &[])],
            vec![DungeonObjective::Survive],
        ));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Room a connects to b but b does not connect back"]);
    }

    #[test]
    fn test_collects_every_error() {
        let mut broken = room("a", 0, &["ghost"]);
        broken.spawn_points.clear();
        let mut dup = room("a", 4, &[]);
        dup.spawn_points = vec![Position::new(0, 0)];
        let mut bad = map(vec![broken, dup], vec![]);
        bad.seed = String::new();

        let result = validate_map(&bad);
        assert!(!result.valid);
        assert!(result.errors.contains(&"Map seed is required".to_string()));
        assert!(result.errors.contains(&"Map must define at least one objective".to_string()));
        assert!(result.errors.contains(&"Duplicate room id: a".to_string()));
        assert!(result.errors.contains(&"Room a has no spawn points".to_string()));
        assert!(result.errors.contains(&"Room a connects to unknown room ghost".to_string()));
        assert!(result
            .errors
            .contains(&"Room a has spawn point (0, 0) outside its bounds".to_string()));
    }

    #[test]
    fn test_empty_map() {
        let result = validate_map(&map(vec![], vec![]));
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_objective_targets_must_exist() {
        let mut lair = room("lair", 0, &[]);
        lair.enemies.push(EnemySpawn {
            id: EntityId::new("boss"),
            name: "Boss".to_string(),
            abilities: AbilityScores::default(),
            stats: CombatStats::new(12, 20, 4),
            weapon: None,
            inventory: vec![],
        });
        lair.items.push(ItemId::new("crown"));

        let ok = validate_map(&map(
            vec![lair.clone()],
            vec![
                DungeonObjective::DefeatBoss {
                    target_id: EntityId::new("boss"),
                },
                DungeonObjective::RetrieveItem {
                    target_id: ItemId::new("crown"),
                },
            ],
        ));
        assert!(ok.valid, "unexpected errors: {:?}", ok.errors);

        let bad = validate_map(&map(
            vec![lair],
            vec![
                DungeonObjective::ClearRoom {
                    target_id: EntityId::new("nobody"),
                },
                DungeonObjective::RetrieveItem {
                    target_id: ItemId::new("sceptre"),
                },
            ],
        ));
        assert_eq!(bad.errors.len(), 2);
    }

    #[test]
    fn test_room_outside_map_bounds() {
        let result = validate_map(&map(vec![room("far", 18, &[])], vec![DungeonObjective::Survive]));
        assert_eq!(result.errors, vec!["Room far extends outside the map bounds"]);
    }

    #[test]
    fn test_unusable_enemy_weapons_are_reported() {
        let spawn = |id: &str, weapon: Weapon| EnemySpawn {
            id: EntityId::new(id),
            name: id.to_string(),
            abilities: AbilityScores::default(),
            stats: CombatStats::new(12, 10, 2),
            weapon: Some(weapon),
            inventory: vec![],
        };
        let mut pit = room("pit", 0, &[]);
        pit.enemies.push(spawn("ok", Weapon::melee("Club", 1, 6)));
        pit.enemies.push(spawn("blunt", Weapon::melee("Stick", 1, 0)));
        pit.enemies.push(spawn("titan", Weapon::melee("Maul", 3_000_000_000, 6)));

        let result = validate_map(&map(vec![pit], vec![DungeonObjective::Survive]));
        assert_eq!(
            result.errors,
            vec![
                "Enemy blunt: Weapon Stick has a zero-sided damage die",
                "Enemy titan: Weapon Maul rolls 3000000000 dice, more than the limit of 100",
            ]
        );
    }
}
