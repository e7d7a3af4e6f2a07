//! Read-only unit and player snapshot

use serde::{Deserialize, Serialize};

use crate::core::error::{MovementError, Result};
use crate::core::types::{PlayerId, UnitId};
use crate::spatial::PlaneCoords;
use crate::units::expanded::ExpandedUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitStatus {
    #[default]
    Alive,
    Dead,
    Dismissed,
}

/// One unit as known to the player planning the move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub owner: PlayerId,
    /// None while the unit is off the map (summoning, in transit)
    pub location: Option<PlaneCoords>,
    pub status: UnitStatus,
    pub details: ExpandedUnit,
}

impl UnitSnapshot {
    pub fn new(id: UnitId, owner: PlayerId, location: PlaneCoords, details: ExpandedUnit) -> Self {
        Self {
            id,
            owner,
            location: Some(location),
            status: UnitStatus::Alive,
            details,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == UnitStatus::Alive
    }
}

/// All units visible to the planning player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRoster {
    pub units: Vec<UnitSnapshot>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, unit: UnitSnapshot) -> &mut Self {
        self.units.push(unit);
        self
    }

    pub fn find(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn alive(&self) -> impl Iterator<Item = &UnitSnapshot> + '_ {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Alive units with a location on the map
    pub fn alive_on_map(&self) -> impl Iterator<Item = (&UnitSnapshot, PlaneCoords)> + '_ {
        self.alive().filter_map(|u| u.location.map(|loc| (u, loc)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Ai,
    /// Owner of lair and node defenders
    Monsters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
}

/// Players known to the session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Players {
    pub players: Vec<Player>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: PlayerId, name: impl Into<String>, kind: PlayerKind) -> &mut Self {
        self.players.push(Player {
            id,
            name: name.into(),
            kind,
        });
        self
    }

    /// Resolve a unit owner; an unknown owner is a fatal lookup failure
    pub fn find(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(MovementError::OwnerLookup(id))
    }
}
