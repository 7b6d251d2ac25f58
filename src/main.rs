//! Delve Engine runner
//!
//! Resolves one run from environment configuration and prints the complete
//! `RunOutput` as JSON on stdout. Logs go to stderr.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delve_engine::domain::entities::{CombatStats, Weapon};
use delve_engine::domain::value_objects::AbilityScores;
use delve_engine::infrastructure::config::AppConfig;
use delve_engine::infrastructure::providers::{DungeonMasterProvider, ExplorerAgent};
use delve_engine::{
    validate_map, Entity, JsonMapRepository, MapId, MapRepositoryPort, ProviderRegistry, RunInput,
    TurnEngine,
};

const PARTY_AGENT: &str = "explorer";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delve_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Map: {}", config.map_id);
    tracing::info!("  Max turns: {}", config.max_turns);

    let mut maps = JsonMapRepository::builtin().context("Failed to load built-in maps")?;
    if let Some(dir) = &config.maps_dir {
        maps = maps
            .with_directory(dir)
            .with_context(|| format!("Failed to load maps from {}", dir.display()))?;
    }

    let map_id = MapId::new(config.map_id.clone());
    let map = maps
        .load_map(&map_id)
        .with_context(|| format!("Unknown map: {} (available: {:?})", map_id, maps.available_maps()))?;
    let validation = validate_map(&map);
    if !validation.valid {
        anyhow::bail!("Map {} is invalid: {}", map_id, validation.errors.join("; "));
    }

    let party = match &config.party_file {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read party file {}", path.display()))?;
            serde_json::from_str::<Vec<Entity>>(&json)
                .with_context(|| format!("Invalid party JSON in {}", path.display()))?
        }
        None => demo_party(),
    };

    let mut input = RunInput::new(
        config.dungeon_seed.clone(),
        config.run_id.clone(),
        config.start_time,
        party,
    )
    .with_map(map_id);
    let players = input.entities.iter().filter(|entity| entity.is_player).count();
    for _ in 0..players {
        input = input.with_agent(PARTY_AGENT);
    }

    let providers = ProviderRegistry::new()
        .with_agent(PARTY_AGENT, Arc::new(ExplorerAgent::new()))
        .with_dungeon_master(Arc::new(DungeonMasterProvider::new()));
    let engine = TurnEngine::new(Arc::new(maps), providers).with_settings(config.engine_settings());

    let output = engine.simulate_run(input).await?;
    tracing::info!(
        result = %output.result,
        turns = output.turns.len(),
        events = output.events.len(),
        "Run complete"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize run output")?
    );
    Ok(())
}

fn demo_party() -> Vec<Entity> {
    vec![
        Entity::player("brenna", "Brenna the Bold")
            .with_abilities(AbilityScores {
                str: 16,
                dex: 12,
                con: 14,
                int: 8,
                wis: 10,
                cha: 12,
            })
            .with_stats(CombatStats::new(16, 28, 5))
            .with_weapon(Weapon::melee("Longsword", 1, 8))
            .with_item("healing-potion"),
        Entity::player("tamsin", "Tamsin Quickfingers")
            .with_abilities(AbilityScores {
                str: 10,
                dex: 16,
                con: 12,
                int: 12,
                wis: 12,
                cha: 10,
            })
            .with_stats(CombatStats::new(14, 20, 5))
            .with_weapon(Weapon::ranged("Shortbow", 1, 6)),
    ]
}
