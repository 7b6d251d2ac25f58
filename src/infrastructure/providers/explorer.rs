//! Rule-based party agent
//!
//! Fights whatever shares its room; otherwise walks toward the nearest room
//! it has not seen yet, then toward any room still holding an opponent.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::outbound::{ActionProvider, DecisionContext, WorldSnapshot};
use crate::domain::entities::{DungeonMap, Entity};
use crate::domain::services::engage_nearest_opponent;
use crate::domain::value_objects::{Action, RoomId};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExplorerAgent;

impl ExplorerAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionProvider for ExplorerAgent {
    async fn decide(&self, context: &DecisionContext) -> anyhow::Result<Option<Action>> {
        let Some(actor) = context.actor() else {
            return Ok(None);
        };
        if let Some(action) = engage_nearest_opponent(actor, &context.world_state.entities) {
            return Ok(Some(action));
        }

        let (Some(map), Some(position), Some(room_id)) =
            (context.world_state.map.as_deref(), actor.position, actor.room_id.as_ref())
        else {
            return Ok(None);
        };

        let world = &context.world_state;
        let next = next_room_toward(map, room_id, |room| !world.is_discovered(room))
            .or_else(|| next_room_toward(map, room_id, |room| holds_opponent(world, actor, room)));
        let Some(next) = next.and_then(|id| map.room(&id)) else {
            return Ok(None);
        };

        debug!(entity_id = %actor.id, toward = %next.id, "Explorer heading for room");
        Ok(Some(Action::move_to(
            actor.id.clone(),
            position.step_toward(&next.center()),
        )))
    }
}

fn holds_opponent(world: &WorldSnapshot, actor: &Entity, room: &RoomId) -> bool {
    world.entities.iter().any(|other| {
        other.is_alive() && actor.is_opponent_of(other) && other.room_id.as_ref() == Some(room)
    })
}

/// First hop on the shortest connection path to a room matching `wanted`
///
/// Breadth-first over room connections in declaration order, so ties go to
/// the room listed first.
fn next_room_toward<F>(map: &DungeonMap, from: &RoomId, wanted: F) -> Option<RoomId>
where
    F: Fn(&RoomId) -> bool,
{
    let mut visited: HashSet<&RoomId> = HashSet::from([from]);
    let mut queue: VecDeque<(&RoomId, &RoomId)> = VecDeque::new();

    for neighbour in &map.room(from)?.connections {
        if visited.insert(neighbour) {
            queue.push_back((neighbour, neighbour));
        }
    }

    while let Some((room_id, first_hop)) = queue.pop_front() {
        if wanted(room_id) {
            return Some(first_hop.clone());
        }
        let Some(room) = map.room(room_id) else {
            continue;
        };
        for neighbour in &room.connections {
            if visited.insert(neighbour) {
                queue.push_back((neighbour, first_hop));
            }
        }
    }
    None
}
