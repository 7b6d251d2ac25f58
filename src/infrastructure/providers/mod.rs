//! Built-in action providers
//!
//! - `DungeonMasterProvider`: controls monsters; strikes when something is in reach
//! - `ExplorerAgent`: a rule-based party agent that fights and explores
//! - `ScriptedProvider`: replays a fixed action script, keyed by turn and entity

mod dungeon_master;
mod explorer;
mod scripted;

pub use dungeon_master::DungeonMasterProvider;
pub use explorer::ExplorerAgent;
pub use scripted::ScriptedProvider;
