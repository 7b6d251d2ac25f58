//! Application services - Run orchestration
//!
//! `TurnEngine` drives a run; `EngineState` is the aggregate it owns while
//! doing so. Action execution is kept separate so it can be exercised against
//! a hand-built state.

pub mod action_executor;
pub mod engine_state;
pub mod turn_engine;

pub use action_executor::execute_action;
pub use engine_state::{DungeonState, EngineState, EntityTable, EventClock, Occupancy, RunPhase};
pub use turn_engine::{EngineError, EngineSettings, ProviderRegistry, RunSession, TurnEngine};
