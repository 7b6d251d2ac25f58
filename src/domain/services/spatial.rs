//! Spatial rules - room membership, movement legality and room transitions

use crate::domain::entities::{DungeonMap, Entity, Room};
use crate::domain::events::ExplorationEvent;
use crate::domain::value_objects::{EntityId, Position, RoomId};

/// Why a move was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    #[error("outside-all-rooms: {target} is not inside any room")]
    OutsideAllRooms { target: Position },

    #[error("not-connected: room {to} is not connected to {from}")]
    NotConnected { from: RoomId, to: RoomId },
}

/// A detected change of room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTransition {
    pub from_room: Option<RoomId>,
    pub to_room: RoomId,
}

/// Low edges inclusive, high edges exclusive
pub fn is_position_in_room(position: &Position, room: &Room) -> bool {
    let bounds = &room.bounds;
    position.x >= bounds.x
        && position.x < bounds.x + bounds.width
        && position.y >= bounds.y
        && position.y < bounds.y + bounds.height
}

/// First room in map order containing `position`
pub fn find_room_for_position<'m>(position: &Position, map: &'m DungeonMap) -> Option<&'m Room> {
    map.rooms
        .iter()
        .find(|room| is_position_in_room(position, room))
}

/// Check a proposed move and return the room it lands in
///
/// An entity without a current room may enter any room containing the target.
pub fn validate_movement<'m>(
    entity: &Entity,
    target: &Position,
    map: &'m DungeonMap,
) -> Result<&'m Room, MovementError> {
    let target_room = find_room_for_position(target, map)
        .ok_or(MovementError::OutsideAllRooms { target: *target })?;

    if let Some(current_id) = &entity.room_id {
        let connected = map
            .room(current_id)
            .is_some_and(|current| current.is_connected_to(&target_room.id));
        if &target_room.id != current_id && !connected {
            return Err(MovementError::NotConnected {
                from: current_id.clone(),
                to: target_room.id.clone(),
            });
        }
    }

    Ok(target_room)
}

/// Detect whether a move to `new_position` changes room
///
/// Connectivity is not checked here; the move is assumed to be approved.
pub fn check_room_transition(
    new_position: &Position,
    map: &DungeonMap,
    current_room_id: Option<&RoomId>,
) -> Option<RoomTransition> {
    let room = find_room_for_position(new_position, map)?;
    if current_room_id == Some(&room.id) {
        return None;
    }
    Some(RoomTransition {
        from_room: current_room_id.cloned(),
        to_room: room.id.clone(),
    })
}

/// `exit_room` (when there was a previous room) followed by `enter_room`
pub fn generate_room_transition_events(
    entity_id: &EntityId,
    transition: &RoomTransition,
) -> Vec<ExplorationEvent> {
    let mut events = Vec::with_capacity(2);
    if let Some(from_room) = &transition.from_room {
        events.push(ExplorationEvent::ExitRoom {
            entity_id: entity_id.clone(),
            room_id: from_room.clone(),
        });
    }
    events.push(ExplorationEvent::EnterRoom {
        entity_id: entity_id.clone(),
        room_id: transition.to_room.clone(),
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DungeonObjective, RoomBounds, RoomType};
    use crate::domain::value_objects::MapId;

    fn room(id: &str, bounds: RoomBounds, connections: &[&str]) -> Room {
        Room {
            id: RoomId::new(id),
            name: id.to_string(),
            bounds,
            room_type: RoomType::Normal,
            connections: connections.iter().map(|c| RoomId::new(*c)).collect(),
            spawn_points: vec![Position::new(bounds.x, bounds.y)],
            items: vec![],
            enemies: vec![],
        }
    }

    fn three_room_map() -> DungeonMap {
        DungeonMap {
            id: MapId::new("test"),
            name: "Test".to_string(),
            seed: "seed".to_string(),
            description: String::new(),
            width: 20,
            height: 20,
            rooms: vec![
                room("a", RoomBounds::new(0, 0, 5, 5), &["b"]),
                room("b", RoomBounds::new(5, 0, 5, 5), &["a", "c"]),
                room("c", RoomBounds::new(5, 5, 5, 5), &["b"]),
            ],
            objectives: vec![DungeonObjective::Survive],
        }
    }

    #[test]
    fn test_room_bounds_are_half_open() {
        let r = room("a", RoomBounds::new(0, 0, 5, 5), &[]);
        assert!(is_position_in_room(&Position::new(0, 0), &r));
        assert!(is_position_in_room(&Position::new(4, 4), &r));
        assert!(!is_position_in_room(&Position::new(5, 4), &r));
        assert!(!is_position_in_room(&Position::new(4, 5), &r));
        assert!(!is_position_in_room(&Position::new(-1, 0), &r));
    }

    #[test]
    fn test_find_room_for_position() {
        let map = three_room_map();
        assert_eq!(
            find_room_for_position(&Position::new(6, 1), &map).map(|r| r.id.as_str()),
            Some("b")
        );
        assert!(find_room_for_position(&Position::new(1, 8), &map).is_none());
    }

    #[test]
    fn test_validate_movement_outside_all_rooms() {
        let map = three_room_map();
        let hero = Entity::player("hero", "Hero").with_room("a");
        assert_eq!(
            validate_movement(&hero, &Position::new(1, 9), &map),
            Err(MovementError::OutsideAllRooms {
                target: Position::new(1, 9)
            })
        );
    }

    #[test]
    fn test_validate_movement_requires_connection() {
        let map = three_room_map();
        let hero = Entity::player("hero", "Hero").with_room("a");
        let err = validate_movement(&hero, &Position::new(6, 6), &map)
            .expect_err("room c is not connected to a");
        assert!(err.to_string().starts_with("not-connected"));

        let moved = validate_movement(&hero, &Position::new(6, 1), &map).expect("a connects to b");
        assert_eq!(moved.id.as_str(), "b");
        let same_room = validate_movement(&hero, &Position::new(2, 2), &map).expect("same room");
        assert_eq!(same_room.id.as_str(), "a");
    }

    #[test]
    fn test_entity_without_room_may_enter_any_room() {
        let map = three_room_map();
        let hero = Entity::player("hero", "Hero");
        assert!(validate_movement(&hero, &Position::new(6, 6), &map).is_ok());
    }

    #[test]
    fn test_check_room_transition() {
        let map = three_room_map();
        let a = RoomId::new("a");
        assert!(check_room_transition(&Position::new(1, 1), &map, Some(&a)).is_none());
        assert!(check_room_transition(&Position::new(1, 9), &map, Some(&a)).is_none());

        // Not connected to a, but connectivity is not this function's concern
        let transition =
            check_room_transition(&Position::new(6, 6), &map, Some(&a)).expect("changes room");
        assert_eq!(transition.from_room, Some(a));
        assert_eq!(transition.to_room.as_str(), "c");
    }

    #[test]
    fn test_transition_events() {
        let hero = EntityId::new("hero");
        let events = generate_room_transition_events(
            &hero,
            &RoomTransition {
                from_room: Some(RoomId::new("a")),
                to_room: RoomId::new("b"),
            },
        );
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ExplorationEvent::ExitRoom { .. }));
        assert!(matches!(events[1], ExplorationEvent::EnterRoom { .. }));

        let first_entry = generate_room_transition_events(
            &hero,
            &RoomTransition {
                from_room: None,
                to_room: RoomId::new("a"),
            },
        );
        assert_eq!(first_entry.len(), 1);
    }
}
