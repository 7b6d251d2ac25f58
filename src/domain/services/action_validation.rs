//! Structural action validation
//!
//! Checks shape and referential existence only. Range, room rules and
//! ownership are enforced when the action is executed, or not at all.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Action, EntityId};

/// Validation verdict with every problem found
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Read access to the entities an action may reference
pub trait EntityLookup {
    /// Whether `id` names an entity in the current run
    fn contains_entity(&self, id: &EntityId) -> bool;
}

/// Validate `action` against the current entity set
pub fn validate_action<L: EntityLookup + ?Sized>(action: &Action, entities: &L) -> ValidationResult {
    let actor_id = action.actor_id();
    if !entities.contains_entity(actor_id) {
        return ValidationResult::from_errors(vec![format!("Actor {} not found", actor_id)]);
    }

    let mut errors = Vec::new();
    match action {
        Action::Move { target, .. } => {
            if !target.x.is_finite() {
                errors.push("target.x must be a finite number".to_string());
            }
            if !target.y.is_finite() {
                errors.push("target.y must be a finite number".to_string());
            }
        }
        Action::Attack { target_id, .. } | Action::Interact { target_id, .. } => {
            if !entities.contains_entity(target_id) {
                errors.push(format!("Target {} not found", target_id));
            }
        }
        Action::SkillCheck {
            skill, difficulty, ..
        } => {
            if skill.trim().is_empty() {
                errors.push("skill must be a non-empty string".to_string());
            }
            if !difficulty.is_finite() {
                errors.push("difficulty must be a finite number".to_string());
            }
        }
        Action::UseItem { item_id, .. } => {
            if item_id.is_empty() {
                errors.push("itemId must not be empty".to_string());
            }
        }
    }

    ValidationResult::from_errors(errors)
}

impl<S: std::hash::BuildHasher> EntityLookup
    for std::collections::HashMap<EntityId, crate::domain::entities::Entity, S>
{
    fn contains_entity(&self, id: &EntityId) -> bool {
        self.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Entity;
    use crate::domain::value_objects::{ActionTarget, ItemId};
    use std::collections::HashMap;

    fn roster() -> HashMap<EntityId, Entity> {
        [Entity::player("hero", "Hero"), Entity::monster("rat-1", "Rat")]
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect()
    }

    #[test]
    fn test_unknown_actor_short_circuits() {
        let action = Action::Move {
            actor_id: EntityId::new("ghost"),
            target: ActionTarget::new(f64::NAN, f64::NAN),
        };
        let result = validate_action(&action, &roster());
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Actor ghost not found".to_string()]);
    }

    #[test]
    fn test_move_rejects_nan_coordinates() {
        let action = Action::Move {
            actor_id: EntityId::new("hero"),
            target: ActionTarget::new(f64::NAN, 10.0),
        };
        let result = validate_action(&action, &roster());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);

        let ok = Action::Move {
            actor_id: EntityId::new("hero"),
            target: ActionTarget::new(3.0, 10.0),
        };
        assert!(validate_action(&ok, &roster()).valid);
    }

    #[test]
    fn test_attack_and_interact_need_known_target() {
        let entities = roster();
        assert!(validate_action(&Action::attack("hero".into(), "rat-1".into()), &entities).valid);
        assert!(!validate_action(&Action::attack("hero".into(), "rat-9".into()), &entities).valid);

        let interact = Action::Interact {
            actor_id: "hero".into(),
            target_id: "nobody".into(),
            interaction: "talk".to_string(),
        };
        assert_eq!(validate_action(&interact, &entities).errors, vec!["Target nobody not found"]);
    }

    #[test]
    fn test_skill_check_shape() {
        let entities = roster();
        let bad = Action::SkillCheck {
            actor_id: "hero".into(),
            skill: " ".to_string(),
            difficulty: f64::NAN,
        };
        assert_eq!(validate_action(&bad, &entities).errors.len(), 2);

        let good = Action::SkillCheck {
            actor_id: "hero".into(),
            skill: "perception".to_string(),
            difficulty: 12.0,
        };
        assert!(validate_action(&good, &entities).valid);
    }

    #[test]
    fn test_use_item_requires_item_id() {
        let entities = roster();
        let action = Action::UseItem {
            actor_id: "hero".into(),
            item_id: ItemId::new(""),
        };
        assert!(!validate_action(&action, &entities).valid);

        // Possession is not checked
        let action = Action::UseItem {
            actor_id: "hero".into(),
            item_id: ItemId::new("healing-potion"),
        };
        assert!(validate_action(&action, &entities).valid);
    }
}
