//! Campaign map - the overland terrain snapshot movement reads
//!
//! One grid of cells per plane. Tower cells exist on every plane at once.

use serde::{Deserialize, Serialize};

use crate::core::types::{MapFeatureId, PlayerId, TileTypeId};
use crate::spatial::{CellGrid, CoordinateSystem, Coords, PlaneCoords, SquareCoordinateSystem};

/// A single overland cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainCell {
    /// None until the planning player has seen this cell
    pub tile_type: Option<TileTypeId>,
    pub map_feature: Option<MapFeatureId>,
    pub corrupted: bool,
    /// Units here count as present on every plane
    pub tower: bool,
    /// Owner of a city on this cell, if any
    pub city_owner: Option<PlayerId>,
}

impl TerrainCell {
    pub fn new(tile_type: impl Into<TileTypeId>) -> Self {
        Self {
            tile_type: Some(tile_type.into()),
            ..Default::default()
        }
    }

    /// Tile type to cost this cell at, substituting `unseen` for unknown terrain
    pub fn tile_type_or<'a>(&'a self, unseen: &'a TileTypeId) -> &'a TileTypeId {
        self.tile_type.as_ref().unwrap_or(unseen)
    }
}

/// The overland map containing all planes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignMap {
    pub coordinate_system: SquareCoordinateSystem,
    planes: Vec<CellGrid<TerrainCell>>,
}

impl CampaignMap {
    /// Create a map with every cell unseen
    pub fn new(coordinate_system: SquareCoordinateSystem, plane_count: u8) -> Self {
        let width = coordinate_system.width as usize;
        let height = coordinate_system.height as usize;
        Self {
            coordinate_system,
            planes: (0..plane_count).map(|_| CellGrid::new(width, height)).collect(),
        }
    }

    /// Create a map with every cell set to `tile_type`
    pub fn filled(
        coordinate_system: SquareCoordinateSystem,
        plane_count: u8,
        tile_type: impl Into<TileTypeId>,
    ) -> Self {
        let cell = TerrainCell::new(tile_type);
        let width = coordinate_system.width as usize;
        let height = coordinate_system.height as usize;
        Self {
            coordinate_system,
            planes: (0..plane_count)
                .map(|_| CellGrid::filled(width, height, cell.clone()))
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.coordinate_system.width as usize
    }

    pub fn height(&self) -> usize {
        self.coordinate_system.height as usize
    }

    pub fn plane_count(&self) -> u8 {
        u8::try_from(self.planes.len()).unwrap_or(u8::MAX)
    }

    /// Get a cell at the given coordinate
    pub fn get(&self, at: PlaneCoords) -> Option<&TerrainCell> {
        self.planes.get(at.plane as usize)?.get(at.coords())
    }

    /// Get a mutable cell at the given coordinate
    pub fn get_mut(&mut self, at: PlaneCoords) -> Option<&mut TerrainCell> {
        self.planes.get_mut(at.plane as usize)?.get_mut(at.coords())
    }

    pub fn contains(&self, at: PlaneCoords) -> bool {
        self.get(at).is_some()
    }

    /// Set terrain at a coordinate
    pub fn set_tile_type(&mut self, at: PlaneCoords, tile_type: impl Into<TileTypeId>) {
        if let Some(cell) = self.get_mut(at) {
            cell.tile_type = Some(tile_type.into());
        }
    }

    /// Place a city owned by `owner`
    pub fn set_city(&mut self, at: PlaneCoords, owner: PlayerId) {
        if let Some(cell) = self.get_mut(at) {
            cell.city_owner = Some(owner);
        }
    }

    /// Mark a tower, which stands on every plane
    pub fn set_tower(&mut self, at: Coords) {
        for plane in &mut self.planes {
            if let Some(cell) = plane.get_mut(at) {
                cell.tower = true;
            }
        }
    }

    pub fn is_tower(&self, at: Coords) -> bool {
        self.planes
            .iter()
            .any(|plane| plane.get(at).is_some_and(|cell| cell.tower))
    }

    /// Every plane a unit standing at `at` is considered present on
    pub fn planes_occupied_from(&self, at: PlaneCoords) -> Vec<u8> {
        if self.is_tower(at.coords()) {
            (0..self.plane_count()).collect()
        } else {
            vec![at.plane]
        }
    }
}
