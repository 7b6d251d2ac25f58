//! Default tactics shared by the engine fallback and the built-in controllers

use crate::domain::entities::Entity;
use crate::domain::value_objects::Action;

/// Closest living opponent sharing the actor's room
///
/// Distance ties go to the lower entity id. Entities without a position are
/// never considered reachable.
pub fn nearest_opponent<'a, I>(actor: &Entity, entities: I) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let origin = actor.position?;
    entities
        .into_iter()
        .filter(|other| other.is_alive() && actor.is_opponent_of(other))
        .filter(|other| other.room_id == actor.room_id)
        .filter_map(|other| other.position.map(|pos| (origin.distance_to(&pos), other)))
        .min_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.id.cmp(&b.id)))
        .map(|(_, other)| other)
}

/// Living opponent standing next to the actor, if any
pub fn adjacent_opponent<'a, I>(actor: &Entity, entities: I) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let origin = actor.position?;
    nearest_opponent(actor, entities)
        .filter(|other| other.position.is_some_and(|pos| pos.distance_to(&origin) <= 1))
}

/// Step toward the nearest opponent in the room, or strike it when adjacent
pub fn engage_nearest_opponent<'a, I>(actor: &Entity, entities: I) -> Option<Action>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let origin = actor.position?;
    let target = nearest_opponent(actor, entities)?;
    let target_pos = target.position?;

    if origin.distance_to(&target_pos) <= 1 {
        Some(Action::attack(actor.id.clone(), target.id.clone()))
    } else {
        Some(Action::move_to(actor.id.clone(), origin.step_toward(&target_pos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CombatStats;
    use crate::domain::value_objects::{ActionTarget, EntityId, Position};

    fn at(entity: Entity, x: i32, y: i32, room: &str) -> Entity {
        entity.with_position(Position::new(x, y)).with_room(room)
    }

    #[test]
    fn test_nearest_opponent_ignores_other_rooms_and_allies() {
        let hero = at(Entity::player("hero", "Hero"), 1, 1, "a");
        let entities = vec![
            hero.clone(),
            at(Entity::player("ally", "Ally"), 2, 1, "a"),
            at(Entity::monster("far", "Far Rat"), 4, 4, "a"),
            at(Entity::monster("next-door", "Rat"), 2, 2, "b"),
        ];
        let nearest = nearest_opponent(&hero, &entities).map(|e| e.id.as_str());
        assert_eq!(nearest, Some("far"));
    }

    #[test]
    fn test_distance_ties_break_on_id() {
        let hero = at(Entity::player("hero", "Hero"), 0, 0, "a");
        let entities = vec![
            at(Entity::monster("rat-b", "Rat"), 3, 0, "a"),
            at(Entity::monster("rat-a", "Rat"), 0, 3, "a"),
        ];
        assert_eq!(
            nearest_opponent(&hero, &entities).map(|e| e.id.as_str()),
            Some("rat-a")
        );
    }

    #[test]
    fn test_engage_steps_then_attacks() {
        let hero = at(Entity::player("hero", "Hero"), 0, 0, "a");
        let rat = at(Entity::monster("rat", "Rat"), 3, 1, "a");
        let action = engage_nearest_opponent(&hero, &[rat.clone()]);
        assert_eq!(
            action,
            Some(Action::Move {
                actor_id: EntityId::new("hero"),
                target: ActionTarget::new(1.0, 1.0),
            })
        );

        let close = at(rat, 1, 1, "a");
        assert_eq!(
            engage_nearest_opponent(&hero, &[close.clone()]),
            Some(Action::attack("hero".into(), "rat".into()))
        );
        assert!(adjacent_opponent(&hero, &[close]).is_some());
    }

    #[test]
    fn test_dead_opponents_are_ignored() {
        let hero = at(Entity::player("hero", "Hero"), 0, 0, "a");
        let mut stats = CombatStats::new(10, 5, 0);
        stats.hp = 0;
        let corpse = at(Entity::monster("rat", "Rat").with_stats(stats), 1, 0, "a");
        assert!(engage_nearest_opponent(&hero, &[corpse]).is_none());
    }
}
