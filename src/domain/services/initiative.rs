//! Initiative - the fixed turn order of a run

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Dice;
use crate::domain::entities::Entity;
use crate::domain::value_objects::{Ability, EntityId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeEntry {
    pub entity_id: EntityId,
    pub initiative: i32,
    pub dex_mod: i32,
}

/// Roll `d20 + DEX modifier` for every entity and sort into turn order
///
/// Draws are taken in the order `entities` yields them. The result is sorted
/// by initiative (high first), then DEX modifier (high first), then entity id
/// (ascending), so the order is total regardless of input order.
pub fn roll_initiative<'a, D, I>(entities: I, dice: &mut D) -> Vec<InitiativeEntry>
where
    D: Dice + ?Sized,
    I: IntoIterator<Item = &'a Entity>,
{
    let mut order: Vec<InitiativeEntry> = entities
        .into_iter()
        .map(|entity| {
            let dex_mod = entity.modifier(Ability::Dex);
            InitiativeEntry {
                entity_id: entity.id.clone(),
                initiative: dice.d(20) as i32 + dex_mod,
                dex_mod,
            }
        })
        .collect();
    order.sort_by(compare_entries);
    order
}

fn compare_entries(a: &InitiativeEntry, b: &InitiativeEntry) -> Ordering {
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| b.dex_mod.cmp(&a.dex_mod))
        .then_with(|| a.entity_id.cmp(&b.entity_id))
}
