//! Ports - Interfaces between the engine and its collaborators

pub mod outbound;
