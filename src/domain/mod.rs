//! Domain layer - Core game rules with no I/O
//!
//! This layer contains:
//! - Entities: combatants and the dungeon map
//! - Value Objects: ids, positions, ability scores, actions
//! - Domain Events: the facts a run emits
//! - Domain Services: dice, initiative, spatial, combat, validation, objectives

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
