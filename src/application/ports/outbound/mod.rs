//! Outbound ports - Interfaces that the engine requires from external systems

mod action_provider_port;
mod map_repository_port;

pub use action_provider_port::{ActionProvider, DecisionContext, WorldSnapshot};
pub use map_repository_port::MapRepositoryPort;
