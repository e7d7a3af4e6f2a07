//! Movement configuration with documented constants
//!
//! All magic numbers used by the movement graphs are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

use crate::core::types::{DoubledMoves, TileTypeId};

/// Configuration for the movement planning systems
///
/// Costs are in doubled movement points, like everything else in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // === OVERLAND ===
    /// Number of vertical planes on the overland map
    ///
    /// A tower start cell runs one relaxation per plane, so this also bounds
    /// how many grids an overland query returns.
    pub planes: u8,

    /// Maximum units one player may have on a single overland cell
    ///
    /// A cell already holding this many friendly units can't be entered.
    pub max_units_per_cell: u32,

    /// Cost of stepping onto a cell only because a friendly transport there
    /// has room for the riders
    ///
    /// Boarding costs the same as open ground (2 = one real point).
    pub boarding_cost: DoubledMoves,

    /// Tile type assumed for cells whose terrain has never been seen
    ///
    /// The rules database must define this tile type; movement rules for it
    /// decide how freely units may wander into the unknown.
    pub unseen_tile_type: TileTypeId,

    // === COMBAT ===
    /// Combat map width in cells
    pub combat_map_width: i32,

    /// Combat map height in cells
    pub combat_map_height: i32,

    /// Cost of entering a mud cell, overriding every terrain layer
    ///
    /// Large enough that mud always eats the rest of a unit's movement.
    pub mud_cost: DoubledMoves,

    /// Cost recorded on enemy cells a unit can shoot at
    ///
    /// Ranged attacks don't need adjacency, so this is a marker rather than
    /// a real distance; it only has to exceed any real combat path.
    pub ranged_attack_cost: DoubledMoves,

    /// Flat cost paid by units that ignore combat terrain
    pub ignore_terrain_cost: DoubledMoves,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            // Overland (two planes, nine units per cell)
            planes: 2,
            max_units_per_cell: 9,
            boarding_cost: 2,
            unseen_tile_type: TileTypeId::new("unseen"),

            // Combat
            combat_map_width: 12,
            combat_map_height: 25,
            mud_cost: 1000,
            ranged_attack_cost: 999,
            ignore_terrain_cost: 2,
        }
    }
}

impl MovementConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from TOML; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> crate::core::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.planes == 0 {
            return Err("planes must be at least 1".into());
        }

        if self.max_units_per_cell == 0 {
            return Err("max_units_per_cell must be at least 1".into());
        }

        if self.boarding_cost == 0 || self.ignore_terrain_cost == 0 {
            return Err("Movement costs must be positive".into());
        }

        if self.combat_map_width <= 0 || self.combat_map_height <= 0 {
            return Err(format!(
                "combat map size ({}x{}) must be positive",
                self.combat_map_width, self.combat_map_height
            ));
        }

        if self.mud_cost <= self.ignore_terrain_cost {
            return Err(format!(
                "mud_cost ({}) should exceed ignore_terrain_cost ({})",
                self.mud_cost, self.ignore_terrain_cost
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<MovementConfig> = OnceLock::new();

/// Get the global movement config (initializes with defaults if not set)
pub fn config() -> &'static MovementConfig {
    CONFIG.get_or_init(MovementConfig::default)
}

/// Set the global movement config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: MovementConfig) -> Result<(), MovementConfig> {
    CONFIG.set(config)
}
