//! Combat resolution - attack rolls, damage and HP changes

use serde::{Deserialize, Serialize};

use super::{Dice, RollMode};
use crate::domain::entities::{Entity, Weapon};
use crate::domain::value_objects::Ability;

/// Outcome of a single attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResult {
    pub hit: bool,
    /// Natural roll plus the attacker's attack bonus
    pub roll: i32,
    pub damage: i32,
    /// Natural 20, regardless of bonuses
    pub critical: bool,
    pub natural_roll: u32,
}

/// Resolve an attack of `attacker` against `target`
///
/// Hit iff `natural + attack bonus >= target AC`. On a hit, weapon damage is
/// the weapon dice plus STR (melee) or DEX (ranged), with the dice doubled on
/// a critical; unarmed damage is `1 + STR` (`2 + STR` on a critical). Damage
/// never goes below zero and is not rolled on a miss. Dice beyond
/// [`Weapon::MAX_DIE_COUNT`] are not rolled.
pub fn attack<D: Dice + ?Sized>(
    attacker: &Entity,
    target: &Entity,
    weapon: Option<&Weapon>,
    dice: &mut D,
    mode: RollMode,
) -> AttackResult {
    let natural_roll = mode.roll(dice, 20);
    let roll = natural_roll as i32 + attacker.stats.attack_bonus;
    let hit = roll >= target.stats.ac;
    let critical = natural_roll == 20;

    let damage = if hit {
        roll_damage(attacker, weapon, critical, dice).max(0)
    } else {
        0
    };

    AttackResult {
        hit,
        roll,
        damage,
        critical,
        natural_roll,
    }
}

fn roll_damage<D: Dice + ?Sized>(
    attacker: &Entity,
    weapon: Option<&Weapon>,
    critical: bool,
    dice: &mut D,
) -> i32 {
    match weapon {
        Some(weapon) => {
            let pool = weapon.die_count.min(Weapon::MAX_DIE_COUNT);
            let count = if critical { pool.saturating_mul(2) } else { pool };
            let rolled = i32::try_from(dice.roll_dice(count, weapon.die)).unwrap_or(i32::MAX);
            rolled.saturating_add(attacker.modifier(weapon.damage_ability()))
        }
        None => {
            let base = if critical { 2 } else { 1 };
            base + attacker.modifier(Ability::Str)
        }
    }
}

/// Copy of `entity` with `amount` damage applied; HP never drops below 0
pub fn apply_damage(entity: &Entity, amount: i32) -> Entity {
    let mut damaged = entity.clone();
    damaged.stats.hp = (entity.stats.hp - amount.max(0)).max(0);
    damaged
}

/// Copy of `entity` healed by `amount`; HP never exceeds max HP
pub fn heal(entity: &Entity, amount: i32) -> Entity {
    let mut healed = entity.clone();
    healed.stats.hp = (entity.stats.hp + amount.max(0)).min(entity.stats.max_hp);
    healed
}

pub fn is_dead(entity: &Entity) -> bool {
    entity.stats.hp <= 0
}
