//! Domain events - Facts emitted while a run is resolved

pub mod game_event;

pub use game_event::{
    CombatEvent, ExplorationEvent, GameEvent, GameEventKind, InteractionEvent, NarrativeEvent,
    SystemEvent,
};
