//! Core configuration shared by the server bootstrap.

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_LEVEL, DEFAULT_LEVEL_THRESHOLDS, PLAYER_MIN_ID};
use crate::player::LevelTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Smallest id a player may carry; lower ids belong to other actors.
    pub player_min_id: u64,
    /// Level assigned to freshly spawned players.
    pub base_level: u32,
    /// `level -> xp required for the next level` pairs, populated before the
    /// server accepts mutations.
    pub level_thresholds: Vec<(u32, u64)>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            player_min_id: PLAYER_MIN_ID,
            base_level: BASE_LEVEL,
            level_thresholds: DEFAULT_LEVEL_THRESHOLDS.to_vec(),
        }
    }
}

impl CoreConfig {
    /// Materialize the shared leveling table from the configured pairs.
    pub fn level_table(&self) -> LevelTable {
        LevelTable::from_pairs(&self.level_thresholds)
    }
}
