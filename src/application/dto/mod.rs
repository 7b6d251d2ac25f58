//! Data Transfer Objects - The boundary of a run
//!
//! DTOs are what callers (API routes, workers, replay tooling) serialize; the
//! engine itself never writes them to a store.

pub mod run;

pub use run::{RunInput, RunOutput, RunResult, Turn};
