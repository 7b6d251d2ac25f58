//! Map repository port - Lookup of static dungeon maps

use std::sync::Arc;

use crate::domain::entities::DungeonMap;
use crate::domain::value_objects::MapId;

/// Source of versioned, immutable map definitions
///
/// An unknown id is `None`, not an error: callers treat a missing map as a
/// cue to generate one elsewhere.
pub trait MapRepositoryPort: Send + Sync {
    fn load_map(&self, id: &MapId) -> Option<Arc<DungeonMap>>;

    /// Ids of every map this repository can load, sorted
    fn available_maps(&self) -> Vec<MapId>;
}
