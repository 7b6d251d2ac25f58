//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::EngineSettings;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Extra directory of `*.json` map files, layered over the built-in maps
    pub maps_dir: Option<PathBuf>,
    /// Turn limit for runs that do not set one
    pub max_turns: u32,
    /// Upper bound on a single action-provider call
    pub provider_timeout: Duration,

    /// Map the runner loads
    pub map_id: String,
    pub dungeon_seed: String,
    pub run_id: String,
    /// Run start, milliseconds since the Unix epoch
    pub start_time: i64,
    /// JSON array of party entities; a demo party is used when unset
    pub party_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            maps_dir: env::var("DELVE_MAPS_DIR").ok().map(PathBuf::from),
            max_turns: env::var("DELVE_MAX_TURNS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("DELVE_MAX_TURNS must be a non-negative integer")?,
            provider_timeout: Duration::from_millis(
                env::var("DELVE_PROVIDER_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .context("DELVE_PROVIDER_TIMEOUT_MS must be a number of milliseconds")?,
            ),

            map_id: env::var("DELVE_MAP_ID").unwrap_or_else(|_| "abandoned-cellar".to_string()),
            dungeon_seed: env::var("DELVE_DUNGEON_SEED")
                .unwrap_or_else(|_| "abandoned-cellar-v1".to_string()),
            run_id: env::var("DELVE_RUN_ID").unwrap_or_else(|_| "local-run".to_string()),
            start_time: env::var("DELVE_START_TIME")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .context("DELVE_START_TIME must be milliseconds since the Unix epoch")?,
            party_file: env::var("DELVE_PARTY_FILE").ok().map(PathBuf::from),
        })
    }

    /// The engine-side subset of this configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            default_max_turns: self.max_turns,
            provider_timeout: self.provider_timeout,
            ..EngineSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_carry_limits() {
        let config = AppConfig {
            maps_dir: None,
            max_turns: 12,
            provider_timeout: Duration::from_millis(250),
            map_id: "goblin-warren".to_string(),
            dungeon_seed: "seed".to_string(),
            run_id: "run".to_string(),
            start_time: 0,
            party_file: None,
        };
        let settings = config.engine_settings();
        assert_eq!(settings.default_max_turns, 12);
        assert_eq!(settings.provider_timeout, Duration::from_millis(250));
        assert_eq!(settings.recent_event_window, 10);
    }
}
