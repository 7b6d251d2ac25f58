//! Application layer - Run orchestration
//!
//! This layer contains:
//! - DTOs: run input, turn records and run output
//! - Ports: interfaces the engine requires (action providers, map lookup)
//! - Services: engine state, action execution and the turn engine

pub mod dto;
pub mod ports;
pub mod services;
