//! Value objects - Immutable objects defined by their attributes

mod abilities;
mod action;
mod ids;
mod position;

pub use abilities::{ability_modifier, Ability, AbilityScores};
pub use action::{Action, ActionTarget};
pub use ids::*;
pub use position::Position;
