//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement points are held doubled so half-point costs stay integral.
/// A value of 3 is 1.5 real movement points.
pub type DoubledMoves = u32;

/// Unique identifier for a player (human, AI or the monsters player)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for a unit in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

content_id!(
    /// Overland tile type from the rules database (grassland, ocean, ...)
    TileTypeId
);
content_id!(
    /// Unit skill from the rules database (flight, swimming, pathfinding, ...)
    SkillId
);
content_id!(
    /// Overland map feature (mineral deposits, lairs, ...)
    MapFeatureId
);
content_id!(
    /// Tile type used on one layer of a combat map cell
    CombatTileTypeId
);
content_id!(
    /// Directional obstruction on a combat map cell (walls, fire, darkness)
    BorderId
);
