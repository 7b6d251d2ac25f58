//! Infrastructure layer - Adapters behind the engine's ports
//!
//! This layer contains:
//! - Config: environment-driven application configuration
//! - Map repository: built-in and on-disk JSON dungeon maps
//! - Providers: the dungeon master controller and built-in party agents

pub mod config;
pub mod map_repository;
pub mod providers;
