//! JSON map repository - Built-in maps plus an optional directory of map files
//!
//! Built-in maps are compiled into the binary. A directory of `*.json` files
//! can be layered on top; a file whose id matches a built-in map replaces it.
//! Maps are parsed once at construction and handed out as shared, immutable
//! values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::ports::outbound::MapRepositoryPort;
use crate::domain::entities::DungeonMap;
use crate::domain::services::validate_map;
use crate::domain::value_objects::MapId;

const BUILTIN_MAPS: &[(&str, &str)] = &[
    (
        "abandoned-cellar.json",
        include_str!("../../maps/abandoned-cellar.json"),
    ),
    ("goblin-warren.json", include_str!("../../maps/goblin-warren.json")),
];

/// Errors while reading or parsing map files
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid map JSON in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Map {id} is defined by both {first} and {second}")]
    Duplicate {
        id: MapId,
        first: String,
        second: String,
    },
}

/// Map repository backed by JSON documents
#[derive(Debug, Clone, Default)]
pub struct JsonMapRepository {
    maps: BTreeMap<MapId, Arc<DungeonMap>>,
}

impl JsonMapRepository {
    /// Repository holding only the maps compiled into the crate
    pub fn builtin() -> Result<Self, MapLoadError> {
        let mut repository = Self::default();
        let mut origins: BTreeMap<MapId, String> = BTreeMap::new();
        for (name, json) in BUILTIN_MAPS {
            let map = parse_map(name, json)?;
            if let Some(first) = origins.insert(map.id.clone(), name.to_string()) {
                return Err(MapLoadError::Duplicate {
                    id: map.id,
                    first,
                    second: name.to_string(),
                });
            }
            repository.insert(map);
        }
        Ok(repository)
    }

    /// Layer every `*.json` file in `dir` over the current maps
    ///
    /// Files are read in path order. Two files defining the same id is an
    /// error; a file redefining a built-in map replaces it.
    pub fn with_directory(mut self, dir: &Path) -> Result<Self, MapLoadError> {
        let io_error = |source| MapLoadError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut origins: BTreeMap<MapId, String> = BTreeMap::new();
        for path in paths {
            let json = fs::read_to_string(&path).map_err(|source| MapLoadError::Io {
                path: path.clone(),
                source,
            })?;
            let origin = path.display().to_string();
            let map = parse_map(&origin, &json)?;

            if let Some(first) = origins.insert(map.id.clone(), origin.clone()) {
                return Err(MapLoadError::Duplicate {
                    id: map.id,
                    first,
                    second: origin,
                });
            }
            if self.insert(map).is_some() {
                info!(path = %origin, "Map file overrides a built-in map");
            }
        }

        info!(dir = %dir.display(), maps = self.maps.len(), "Map directory loaded");
        Ok(self)
    }

    /// Add or replace a map, returning the one it replaced
    pub fn insert(&mut self, map: DungeonMap) -> Option<Arc<DungeonMap>> {
        let validation = validate_map(&map);
        if !validation.valid {
            warn!(map_id = %map.id, errors = ?validation.errors, "Map failed validation");
        }
        debug!(map_id = %map.id, rooms = map.rooms.len(), "Map registered");
        self.maps.insert(map.id.clone(), Arc::new(map))
    }
}

impl MapRepositoryPort for JsonMapRepository {
    fn load_map(&self, id: &MapId) -> Option<Arc<DungeonMap>> {
        self.maps.get(id).cloned()
    }

    fn available_maps(&self) -> Vec<MapId> {
        self.maps.keys().cloned().collect()
    }
}

fn parse_map(origin: &str, json: &str) -> Result<DungeonMap, MapLoadError> {
    serde_json::from_str(json).map_err(|source| MapLoadError::Parse {
        origin: origin.to_string(),
        source,
    })
}
