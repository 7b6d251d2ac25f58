//! Ability scores and the skill-to-ability table used for skill checks

use serde::{Deserialize, Serialize};

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    /// Resolve the ability a named skill is rolled with
    ///
    /// Ability names themselves ("str", "dexterity", ...) are accepted so a
    /// provider can request a raw ability check.
    pub fn for_skill(skill: &str) -> Option<Self> {
        let normalized = skill.trim().to_lowercase().replace([' ', '-'], "_");
        let ability = match normalized.as_str() {
            "athletics" | "str" | "strength" => Self::Str,
            "acrobatics" | "stealth" | "sleight_of_hand" | "dex" | "dexterity" => Self::Dex,
            "con" | "constitution" | "endurance" => Self::Con,
            "arcana" | "history" | "investigation" | "nature" | "religion" | "int"
            | "intelligence" => Self::Int,
            "perception" | "insight" | "survival" | "medicine" | "animal_handling" | "wis"
            | "wisdom" => Self::Wis,
            "persuasion" | "deception" | "intimidation" | "performance" | "cha" | "charisma" => {
                Self::Cha
            }
            _ => return None,
        };
        Some(ability)
    }
}

/// Ability scores, each typically 1-20
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            str: 10,
            dex: 10,
            con: 10,
            int: 10,
            wis: 10,
            cha: 10,
        }
    }
}

impl AbilityScores {
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }
}

/// `floor((score - 10) / 2)`, rounding toward negative infinity for low scores
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}
