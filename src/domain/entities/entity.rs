//! Entity - a combatant taking part in a run (player hero or monster)

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Ability, AbilityScores, EntityId, ItemId, Position, RoomId};

/// A player hero or a monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub abilities: AbilityScores,
    pub stats: CombatStats,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    pub is_player: bool,
    #[serde(default)]
    pub inventory: Vec<ItemId>,
    /// Equipped weapon; unarmed when absent
    #[serde(default)]
    pub weapon: Option<Weapon>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, is_player: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            abilities: AbilityScores::default(),
            stats: CombatStats::default(),
            position: None,
            room_id: None,
            is_player,
            inventory: Vec::new(),
            weapon: None,
        }
    }

    pub fn player(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self::new(id, name, true)
    }

    pub fn monster(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self::new(id, name, false)
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_room(mut self, room_id: impl Into<RoomId>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_item(mut self, item_id: impl Into<ItemId>) -> Self {
        self.inventory.push(item_id.into());
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// Players and monsters are on opposing teams
    pub fn is_opponent_of(&self, other: &Entity) -> bool {
        self.is_player != other.is_player
    }

    pub fn has_item(&self, item_id: &ItemId) -> bool {
        self.inventory.contains(item_id)
    }

    pub fn remove_item(&mut self, item_id: &ItemId) -> bool {
        if let Some(pos) = self.inventory.iter().position(|id| id == item_id) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }
}

/// Derived combat numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub ac: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attack_bonus: i32,
}

impl CombatStats {
    pub fn new(ac: i32, max_hp: i32, attack_bonus: i32) -> Self {
        Self {
            ac,
            hp: max_hp,
            max_hp,
            attack_bonus,
        }
    }
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(10, 10, 0)
    }
}

/// A weapon: `dieCount`d`die` damage plus STR (melee) or DEX (ranged)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub name: String,
    pub die_count: u32,
    pub die: u32,
    #[serde(default)]
    pub ranged: bool,
}

impl Weapon {
    /// Largest damage pool a weapon may roll before a critical doubles it
    pub const MAX_DIE_COUNT: u32 = 100;

    pub fn melee(name: impl Into<String>, die_count: u32, die: u32) -> Self {
        Self {
            name: name.into(),
            die_count,
            die,
            ranged: false,
        }
    }

    pub fn ranged(name: impl Into<String>, die_count: u32, die: u32) -> Self {
        Self {
            ranged: true,
            ..Self::melee(name, die_count, die)
        }
    }

    /// Reason this weapon cannot be used, if any
    pub fn problem(&self) -> Option<String> {
        if self.die == 0 {
            Some(format!("Weapon {} has a zero-sided damage die", self.name))
        } else if self.die_count > Self::MAX_DIE_COUNT {
            Some(format!(
                "Weapon {} rolls {} dice, more than the limit of {}",
                self.name,
                self.die_count,
                Self::MAX_DIE_COUNT
            ))
        } else {
            None
        }
    }

    pub fn damage_ability(&self) -> Ability {
        if self.ranged {
            Ability::Dex
        } else {
            Ability::Str
        }
    }
}
