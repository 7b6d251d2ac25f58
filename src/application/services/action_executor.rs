//! Action execution - turns a validated action into state changes and events
//!
//! Nothing here fails: a rejected action becomes a `system` event and leaves
//! state untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::engine_state::EngineState;
use crate::domain::entities::Entity;
use crate::domain::events::{
    CombatEvent, ExplorationEvent, GameEvent, InteractionEvent, SystemEvent,
};
use crate::domain::services::{
    apply_damage, attack, check_room_transition, generate_room_transition_events, heal,
    validate_action, validate_movement, Dice, RollMode,
};
use crate::domain::value_objects::{Ability, Action, EntityId, ItemId, Position, RoomId};

const HEALING_POTION: &str = "healing-potion";
const HEALING_POTION_PREFIX: &str = "potion-of-healing";

/// Validate and execute `action`, returning the events it produced
pub fn execute_action(
    state: &mut EngineState,
    action: &Action,
    timestamp: DateTime<Utc>,
) -> Vec<GameEvent> {
    let validation = validate_action(action, &state.entities);
    if !validation.valid {
        return vec![reject(state, action, validation.errors, timestamp)];
    }

    let actor = match state.entity(action.actor_id()) {
        Some(actor) if actor.is_alive() => actor.clone(),
        _ => {
            let error = format!("Actor {} is dead", action.actor_id());
            return vec![reject(state, action, vec![error], timestamp)];
        }
    };

    match action {
        Action::Move { target, .. } => execute_move(state, action, &actor, target.to_position(), timestamp),
        Action::Attack { target_id, .. } => execute_attack(state, action, &actor, target_id, timestamp),
        Action::SkillCheck {
            skill, difficulty, ..
        } => execute_skill_check(state, &actor, skill, *difficulty, timestamp),
        Action::UseItem { item_id, .. } => execute_use_item(state, &actor, item_id, timestamp),
        Action::Interact {
            target_id,
            interaction,
            ..
        } => {
            let event = InteractionEvent::Interact {
                actor_id: actor.id.clone(),
                target_id: target_id.clone(),
                interaction: interaction.clone(),
            };
            vec![state.clock.emit(timestamp, event)]
        }
    }
}

/// A `system` event recording why `action` was not executed
pub fn reject(
    state: &mut EngineState,
    action: &Action,
    errors: Vec<String>,
    timestamp: DateTime<Utc>,
) -> GameEvent {
    debug!(
        run_id = %state.run_id,
        actor_id = %action.actor_id(),
        action = action.kind(),
        ?errors,
        "Action rejected"
    );
    state.clock.emit(
        timestamp,
        SystemEvent::ActionRejected {
            actor_id: action.actor_id().clone(),
            action_type: action.kind().to_string(),
            errors,
        },
    )
}

fn execute_move(
    state: &mut EngineState,
    action: &Action,
    actor: &Entity,
    target: Position,
    timestamp: DateTime<Utc>,
) -> Vec<GameEvent> {
    let Some(map) = state.map().map(Arc::clone) else {
        // No map: free movement, room membership unchanged
        state.place(&actor.id, target, actor.room_id.clone());
        let event = ExplorationEvent::Move {
            entity_id: actor.id.clone(),
            from: actor.position,
            to: target,
        };
        return vec![state.clock.emit(timestamp, event)];
    };

    let room_id = match validate_movement(actor, &target, &map) {
        Ok(room) => room.id.clone(),
        Err(err) => return vec![reject(state, action, vec![err.to_string()], timestamp)],
    };
    let transition = check_room_transition(&target, &map, actor.room_id.as_ref());

    state.place(&actor.id, target, Some(room_id.clone()));
    let mut events = vec![state.clock.emit(
        timestamp,
        ExplorationEvent::Move {
            entity_id: actor.id.clone(),
            from: actor.position,
            to: target,
        },
    )];

    if let Some(transition) = transition {
        debug!(
            entity_id = %actor.id,
            from = ?transition.from_room,
            to = %transition.to_room,
            "Room transition"
        );
        for event in generate_room_transition_events(&actor.id, &transition) {
            events.push(state.clock.emit(timestamp, event));
        }
        if actor.is_player {
            state.discover(&transition.to_room);
        }
    }

    if actor.is_player {
        events.extend(pick_up_room_items(state, &actor.id, &room_id, timestamp));
    }
    events
}

fn pick_up_room_items(
    state: &mut EngineState,
    actor_id: &EntityId,
    room_id: &RoomId,
    timestamp: DateTime<Utc>,
) -> Vec<GameEvent> {
    let items = match state.dungeon.as_mut() {
        Some(dungeon) => dungeon.take_room_items(room_id),
        None => return Vec::new(),
    };
    if let Some(actor) = state.entities.get_mut(actor_id) {
        actor.inventory.extend(items.iter().cloned());
    }
    items
        .into_iter()
        .map(|item_id| {
            state.clock.emit(
                timestamp,
                SystemEvent::ItemPickedUp {
                    actor_id: actor_id.clone(),
                    item_id,
                    room_id: room_id.clone(),
                },
            )
        })
        .collect()
}

fn execute_attack(
    state: &mut EngineState,
    action: &Action,
    attacker: &Entity,
    target_id: &EntityId,
    timestamp: DateTime<Utc>,
) -> Vec<GameEvent> {
    let Some(target) = state.entity(target_id).cloned() else {
        return vec![reject(state, action, vec![format!("Target {} not found", target_id)], timestamp)];
    };
    if !target.is_alive() {
        let error = format!("Target {} is already dead", target_id);
        return vec![reject(state, action, vec![error], timestamp)];
    }
    if attacker.room_id != target.room_id {
        let error = format!("Target {} is not in the same room", target_id);
        return vec![reject(state, action, vec![error], timestamp)];
    }

    let result = attack(
        attacker,
        &target,
        attacker.weapon.as_ref(),
        &mut state.rng,
        RollMode::Normal,
    );
    let damaged = apply_damage(&target, result.damage);
    let killed = !damaged.is_alive();
    let target_hp = damaged.stats.hp;
    state.entities.replace(damaged);

    debug!(
        attacker_id = %attacker.id,
        target_id = %target_id,
        roll = result.roll,
        hit = result.hit,
        damage = result.damage,
        target_hp,
        "Attack resolved"
    );

    let mut events = vec![state.clock.emit(
        timestamp,
        CombatEvent::Attack {
            attacker_id: attacker.id.clone(),
            target_id: target_id.clone(),
            weapon: attacker.weapon.as_ref().map(|weapon| weapon.name.clone()),
            natural_roll: result.natural_roll,
            roll: result.roll,
            hit: result.hit,
            critical: result.critical,
            damage: result.damage,
            target_hp,
        },
    )];
    if killed {
        events.push(state.clock.emit(
            timestamp,
            CombatEvent::Death {
                entity_id: target_id.clone(),
                killed_by: attacker.id.clone(),
            },
        ));
    }
    events
}

fn execute_skill_check(
    state: &mut EngineState,
    actor: &Entity,
    skill: &str,
    difficulty: f64,
    timestamp: DateTime<Utc>,
) -> Vec<GameEvent> {
    let modifier = Ability::for_skill(skill)
        .map(|ability| actor.modifier(ability))
        .unwrap_or(0);
    let natural_roll = state.rng.d(20);
    let total = natural_roll as i32 + modifier;

    let event = InteractionEvent::SkillCheck {
        actor_id: actor.id.clone(),
        skill: skill.to_string(),
        natural_roll,
        modifier,
        total,
        difficulty,
        success: f64::from(total) >= difficulty,
    };
    vec![state.clock.emit(timestamp, event)]
}

fn is_healing_potion(item_id: &ItemId) -> bool {
    item_id.as_str() == HEALING_POTION || item_id.as_str().starts_with(HEALING_POTION_PREFIX)
}

fn execute_use_item(
    state: &mut EngineState,
    actor: &Entity,
    item_id: &ItemId,
    timestamp: DateTime<Utc>,
) -> Vec<GameEvent> {
    let healed = if is_healing_potion(item_id) {
        let amount = state.rng.roll_dice(2, 4) as i32 + 2;
        let mut updated = heal(actor, amount);
        updated.remove_item(item_id);
        let restored = updated.stats.hp - actor.stats.hp;
        state.entities.replace(updated);
        Some(restored)
    } else {
        None
    };

    let event = SystemEvent::ItemUsed {
        actor_id: actor.id.clone(),
        item_id: item_id.clone(),
        healed,
    };
    vec![state.clock.emit(timestamp, event)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::engine_state::DungeonState;
    use crate::domain::entities::{
        CombatStats, DungeonMap, DungeonObjective, Room, RoomBounds, RoomType,
    };
    use crate::domain::events::GameEventKind;
    use crate::domain::services::generate_seed;
    use crate::domain::value_objects::{ActionTarget, MapId};

    fn room(id: &str, x: i32, connections: &[&str], items: &[&str]) -> Room {
        Room {
            id: RoomId::new(id),
            name: id.to_string(),
            bounds: RoomBounds::new(x, 0, 5, 5),
            room_type: RoomType::Normal,
            connections: connections.iter().map(|c| RoomId::new(*c)).collect(),
            spawn_points: vec![Position::new(x + 1, 1)],
            items: items.iter().map(|i| ItemId::new(*i)).collect(),
            enemies: vec![],
        }
    }

    fn state_with_map(entities: Vec<Entity>) -> EngineState {
        let map = DungeonMap {
            id: MapId::new("test"),
            name: "Test".to_string(),
            seed: "seed".to_string(),
            description: String::new(),
            width: 15,
            height: 5,
            rooms: vec![
                room("a", 0, &["b"], &[]),
                room("b", 5, &["a", "c"], &["gem"]),
                room("c", 10, &["b"], &[]),
            ],
            objectives: vec![DungeonObjective::Survive],
        };
        let mut state = EngineState::new("run".to_string(), generate_seed("s", "run", 0), 0);
        state.dungeon = Some(DungeonState::new(Arc::new(map)));
        for entity in entities {
            let id = entity.id.clone();
            let position = entity.position;
            let room_id = entity.room_id.clone();
            state.entities.insert(entity).expect("unique ids");
            if let Some(position) = position {
                state.place(&id, position, room_id);
            }
        }
        state
    }

    fn hero_at(x: i32, room: &str) -> Entity {
        Entity::player("hero", "Hero")
            .with_stats(CombatStats::new(14, 12, 10))
            .with_position(Position::new(x, 2))
            .with_room(room)
    }

    fn now(state: &EngineState) -> DateTime<Utc> {
        state.clock.timestamp(1, 0)
    }

    #[test]
    fn test_nan_move_is_rejected_without_moving() {
        let mut state = state_with_map(vec![hero_at(1, "a")]);
        let action = Action::Move {
            actor_id: EntityId::new("hero"),
            target: ActionTarget::new(f64::NAN, 10.0),
        };
        let ts = now(&state);
        let events = execute_action(&mut state, &action, ts);

        assert_eq!(events.len(), 1);
        assert!(events[0].is_system());
        assert_eq!(
            state.entity(&EntityId::new("hero")).and_then(|e| e.position),
            Some(Position::new(1, 2))
        );
    }

    #[test]
    fn test_move_into_connected_room_emits_transition_and_loot() {
        let mut state = state_with_map(vec![hero_at(4, "a")]);
        let ts = now(&state);
        let events = execute_action(
            &mut state,
            &Action::move_to(EntityId::new("hero"), Position::new(5, 2)),
            ts,
        );

        let kinds: Vec<&GameEventKind> = events.iter().map(|e| &e.kind).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(kinds[0], GameEventKind::Exploration(ExplorationEvent::Move { .. })));
        assert!(matches!(kinds[1], GameEventKind::Exploration(ExplorationEvent::ExitRoom { .. })));
        assert!(matches!(kinds[2], GameEventKind::Exploration(ExplorationEvent::EnterRoom { .. })));
        assert!(matches!(kinds[3], GameEventKind::System(SystemEvent::ItemPickedUp { .. })));
        assert!(events.iter().all(|e| e.timestamp == ts));

        let hero = state.entity(&EntityId::new("hero")).expect("hero present");
        assert_eq!(hero.room_id, Some(RoomId::new("b")));
        assert!(hero.has_item(&ItemId::new("gem")));
        let dungeon = state.dungeon.as_ref().expect("dungeon present");
        assert!(dungeon.discovered.contains(&RoomId::new("b")));
        assert_eq!(
            dungeon.entities.get(&EntityId::new("hero")).map(|o| o.room_id.clone()),
            Some(RoomId::new("b"))
        );
    }

    #[test]
    fn test_move_to_unconnected_room_is_rejected() {
        let mut state = state_with_map(vec![hero_at(1, "a")]);
        let ts = now(&state);
        let events = execute_action(
            &mut state,
            &Action::move_to(EntityId::new("hero"), Position::new(11, 2)),
            ts,
        );
        assert_eq!(events.len(), 1);
        match &events[0].kind {
            GameEventKind::System(SystemEvent::ActionRejected { errors, .. }) => {
                assert!(errors[0].starts_with("not-connected"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            state.entity(&EntityId::new("hero")).and_then(|e| e.room_id.clone()),
            Some(RoomId::new("a"))
        );
    }

    #[test]
    fn test_attack_requires_same_room() {
        let rat = Entity::monster("rat", "Rat")
            .with_stats(CombatStats::new(10, 4, 2))
            .with_position(Position::new(6, 2))
            .with_room("b");
        let mut state = state_with_map(vec![hero_at(4, "a"), rat]);
        let ts = now(&state);
        let events = execute_action(&mut state, &Action::attack("hero".into(), "rat".into()), ts);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_system());
        assert_eq!(state.entity(&EntityId::new("rat")).map(|e| e.stats.hp), Some(4));
    }

    #[test]
    fn test_lethal_attack_emits_death() {
        let rat = Entity::monster("rat", "Rat")
            .with_stats(CombatStats::new(10, 1, 2))
            .with_position(Position::new(2, 2))
            .with_room("a");
        let hero = hero_at(1, "a").with_abilities(crate::domain::value_objects::AbilityScores {
            str: 14,
            ..Default::default()
        });
        let mut state = state_with_map(vec![hero, rat]);
        let ts = now(&state);

        // Bonus 10 against AC 10 always hits; unarmed damage is at least 1 + 2
        let events = execute_action(&mut state, &Action::attack("hero".into(), "rat".into()), ts);
        assert_eq!(events.len(), 2);
        assert!(events[1].is_death_of(&EntityId::new("rat")));
        assert_eq!(state.entity(&EntityId::new("rat")).map(|e| e.stats.hp), Some(0));

        let again = execute_action(&mut state, &Action::attack("hero".into(), "rat".into()), ts);
        assert_eq!(again.len(), 1);
        assert!(again[0].is_system());
    }

    #[test]
    fn test_healing_potion_is_consumed() {
        let mut hero = hero_at(1, "a").with_item("healing-potion");
        hero.stats.hp = 1;
        let mut state = state_with_map(vec![hero]);
        let ts = now(&state);
        let action = Action::UseItem {
            actor_id: EntityId::new("hero"),
            item_id: ItemId::new("healing-potion"),
        };
        let events = execute_action(&mut state, &action, ts);

        let hero = state.entity(&EntityId::new("hero")).expect("hero present");
        assert!(hero.stats.hp >= 5 && hero.stats.hp <= 11, "hp {}", hero.stats.hp);
        assert!(hero.inventory.is_empty());
        match &events[0].kind {
            GameEventKind::System(SystemEvent::ItemUsed { healed, .. }) => {
                assert_eq!(*healed, Some(hero.stats.hp - 1));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_skill_check_records_roll() {
        let mut state = state_with_map(vec![hero_at(1, "a")]);
        let ts = now(&state);
        let action = Action::SkillCheck {
            actor_id: EntityId::new("hero"),
            skill: "perception".to_string(),
            difficulty: 1.0,
        };
        let events = execute_action(&mut state, &action, ts);
        match &events[0].kind {
            GameEventKind::Interaction(InteractionEvent::SkillCheck {
                natural_roll,
                total,
                success,
                ..
            }) => {
                assert_eq!(*total, *natural_roll as i32);
                assert!(*success);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_dead_actor_cannot_act() {
        let mut hero = hero_at(1, "a");
        hero.stats.hp = 0;
        let mut state = state_with_map(vec![hero]);
        let ts = now(&state);
        let events = execute_action(
            &mut state,
            &Action::move_to(EntityId::new("hero"), Position::new(2, 2)),
            ts,
        );
        assert!(events[0].is_system());
    }
}
