//! Domain services - Pure game rules
//!
//! Everything here is deterministic given its inputs and a `Dice` source:
//! no I/O, no clocks, no global randomness.

pub mod action_validation;
pub mod combat;
pub mod dice;
pub mod initiative;
pub mod map_validation;
pub mod objectives;
pub mod rng;
pub mod spatial;
pub mod tactics;

pub use action_validation::{validate_action, EntityLookup, ValidationResult};
pub use combat::{apply_damage, attack, heal, is_dead, AttackResult};
pub use dice::{Dice, RollMode};
pub use initiative::{roll_initiative, InitiativeEntry};
pub use map_validation::{validate_map, MapValidation};
pub use objectives::{are_all_objectives_complete, check_objective, is_party_wiped};
pub use rng::{generate_seed, GameRng, RunSeed};
pub use spatial::{
    check_room_transition, find_room_for_position, generate_room_transition_events,
    is_position_in_room, validate_movement, MovementError, RoomTransition,
};
pub use tactics::{adjacent_opponent, engage_nearest_opponent, nearest_opponent};
