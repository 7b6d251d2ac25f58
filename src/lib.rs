//! Delve Engine - Deterministic turn engine for dungeon-crawler runs
//!
//! A run takes a party, a dungeon map and a set of action providers, and
//! resolves them into an append-only event log and a terminal result. Every
//! random decision comes from a generator seeded by the run's identity, so
//! the same inputs always replay to the same log.
//!
//! ```ignore
//! let maps = Arc::new(JsonMapRepository::builtin()?);
//! let providers = ProviderRegistry::new()
//!     .with_agent("explorer", Arc::new(ExplorerAgent::new()))
//!     .with_dungeon_master(Arc::new(DungeonMasterProvider::new()));
//! let output = TurnEngine::new(maps, providers)
//!     .simulate_run(RunInput::new("cellar-v1", "run-1", 0, party).with_map("abandoned-cellar"))
//!     .await?;
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::dto::{RunInput, RunOutput, RunResult, Turn};
pub use application::ports::outbound::{
    ActionProvider, DecisionContext, MapRepositoryPort, WorldSnapshot,
};
pub use application::services::{
    EngineError, EngineSettings, EngineState, ProviderRegistry, RunPhase, RunSession, TurnEngine,
};
pub use domain::entities::{DungeonMap, DungeonObjective, Entity};
pub use domain::events::GameEvent;
pub use domain::services::{generate_seed, validate_map, Dice, GameRng, RunSeed};
pub use domain::value_objects::{Action, EntityId, MapId};
pub use infrastructure::map_repository::{JsonMapRepository, MapLoadError};
